//! JSON report export.
//!
//! A direct structural dump of the report's fields — project name, creation
//! timestamp, locale, findings, metrics, summaries. The only export exempt
//! from the severity chart. Decoding the output yields the same project
//! name, finding count, and metric keys/values that were added.

use crate::report::{Report, ReportError};

/// Serializes the report as pretty-printed JSON.
pub fn render(report: &Report) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}
