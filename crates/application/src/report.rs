use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use sentinel_detect_core::AppResult;
use sentinel_detect_domain::DetectionRecord;

mod console;
mod csv;
mod json;
mod summary;


pub use console::{NO_RESULTS_CONSOLE, render_console};
pub use csv::{CSV_COLUMNS, NO_RESULTS_CSV, render_csv};
pub use json::{ReportEnvelope, render_json};
pub use summary::ScanSummary;

/// Rendering selected for the migration report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human-readable text grouped by workspace.
    #[default]
    Console,
    /// JSON envelope with the full records.
    Json,
    /// One CSV row per record.
    Csv,
}

impl ReportFormat {
    /// Returns the stable format name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl Display for ReportFormat {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Rendering switches that do not change report content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Emit single-line JSON instead of indented JSON.
    pub compact_json: bool,
}

/// Renders records in the selected format.
pub fn render_report(
    format: ReportFormat,
    records: &[DetectionRecord],
    generated_at: DateTime<Utc>,
    options: RenderOptions,
) -> AppResult<String> {
    match format {
        ReportFormat::Console => Ok(render_console(records, generated_at)),
        ReportFormat::Json => render_json(records, generated_at, !options.compact_json),
        ReportFormat::Csv => Ok(render_csv(records)),
    }
}

/// Spells booleans the way the console and CSV reports print them.
pub(crate) fn display_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
