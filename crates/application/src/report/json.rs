use chrono::{DateTime, SecondsFormat, Utc};
use sentinel_detect_core::{AppError, AppResult};
use sentinel_detect_domain::{DetectionRecord, MIGRATION_DEADLINE};
use serde::{Deserialize, Serialize};

/// Structured report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    /// Generation time in RFC 3339.
    pub generated_at: String,
    /// Number of records in `results`.
    pub total_rules_with_classic_automation: usize,
    /// Migration deadline date.
    pub migration_deadline: String,
    /// Flagged rules in scan order.
    pub results: Vec<DetectionRecord>,
}

impl ReportEnvelope {
    /// Wraps records with generation metadata.
    #[must_use]
    pub fn new(records: &[DetectionRecord], generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            total_rules_with_classic_automation: records.len(),
            migration_deadline: MIGRATION_DEADLINE.to_owned(),
            results: records.to_vec(),
        }
    }
}

/// Renders the JSON envelope, indented when `pretty` is set.
pub fn render_json(
    records: &[DetectionRecord],
    generated_at: DateTime<Utc>,
    pretty: bool,
) -> AppResult<String> {
    let envelope = ReportEnvelope::new(records, generated_at);
    let rendered = if pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    };

    rendered.map_err(|error| {
        AppError::Internal(format!("failed to serialize JSON report: {error}"))
    })
}
