use std::path::Path;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use sentinel_detect_application::{ScanService, render_report};
use sentinel_detect_core::{AppError, AppResult};
use sentinel_detect_domain::DetectionRecord;

use crate::cli_config::CliConfig;

/// Result of a completed scan, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No analytic rule uses classic automation.
    Clean,
    /// At least one rule needs migration.
    MigrationRequired(usize),
}

impl ScanOutcome {
    pub fn from_records(records: &[DetectionRecord]) -> Self {
        if records.is_empty() {
            Self::Clean
        } else {
            Self::MigrationRequired(records.len())
        }
    }

    pub fn exit_status(self) -> u8 {
        match self {
            Self::Clean => 0,
            Self::MigrationRequired(_) => 1,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Exit status for runs that end in an error.
pub const ERROR_EXIT_STATUS: u8 = 2;

/// Flagged records of one scan and the report rendered from them.
#[derive(Debug)]
pub struct RenderedScan {
    pub records: Vec<DetectionRecord>,
    pub report: String,
}

impl RenderedScan {
    pub fn outcome(&self) -> ScanOutcome {
        ScanOutcome::from_records(&self.records)
    }
}

/// Scans the configured target and renders the report in the configured
/// format.
pub async fn scan_and_render(
    scan_service: &ScanService,
    config: &CliConfig,
    generated_at: DateTime<Utc>,
) -> AppResult<RenderedScan> {
    let records = scan_service.scan_target(&config.target).await?;
    let report = render_report(config.format, &records, generated_at, config.render_options)?;

    Ok(RenderedScan { records, report })
}

/// Writes the rendered report verbatim.
pub async fn write_report(path: &Path, report: &str) -> AppResult<()> {
    tokio::fs::write(path, report).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to write report to '{}': {error}",
            path.display()
        ))
    })
}
