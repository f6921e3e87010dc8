#[cfg(feature = "json")]
use serde::Serialize;

use crate::error::{Result, SyncError};
use crate::services::pipeline::SyncReport;

#[cfg(feature = "json")]
#[derive(Serialize)]
struct JsonReport<'a> {
    schema_version: u8,
    url: &'a str,
    offset_s: f64,
    offset_ms: f64,
    second_offset: i64,
    ms_offset: f64,
    latency: crate::domain::LatencyProfile,
    verified: bool,
}

/// Serialize a [`SyncReport`] into the CLI's JSON schema.
#[allow(unused_variables)]
pub fn to_json(url: &str, report: &SyncReport, pretty: bool) -> Result<String> {
    #[cfg(feature = "json")]
    {
        let doc = JsonReport {
            schema_version: 1,
            url,
            offset_s: report.offset_s,
            offset_ms: report.offset_ms(),
            second_offset: report.second_offset,
            ms_offset: report.ms_offset,
            latency: report.latency,
            verified: report.verified,
        };

        let text = if pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        }
        .map_err(|e| SyncError::InvalidArgument(e.to_string()))?;
        Ok(text)
    }
    #[cfg(not(feature = "json"))]
    {
        let _ = (url, report, pretty);
        Err(SyncError::InvalidArgument("json feature disabled".into()))
    }
}
