//! Output module for check reports
//!
//! This module handles:
//! - Rendering the check result as JSON
//! - Summarizing crawl statistics in the log

pub mod stats;

pub use stats::{collect_statistics, log_statistics, CrawlStatistics};

use crate::state::CheckResult;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Renders a check result as JSON indented by four spaces
///
/// URLs appear in sorted order, so two runs over the same site produce
/// identical reports.
pub fn render_json(result: &CheckResult) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    result.serialize(&mut serializer)?;
    String::from_utf8(buffer)
        .map_err(|e| serde_json::Error::io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
