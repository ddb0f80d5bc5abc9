use std::collections::{BTreeMap, BTreeSet};

use sentinel_detect_domain::DetectionRecord;

/// Aggregate view of a scan: flagged rules per severity and the playbooks
/// that need new automation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    total: usize,
    by_severity: BTreeMap<String, usize>,
    playbooks: BTreeSet<String>,
}

impl ScanSummary {
    /// Builds the summary from scan results.
    #[must_use]
    pub fn from_records(records: &[DetectionRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            *summary
                .by_severity
                .entry(record.severity().to_owned())
                .or_insert(0) += 1;
            summary.playbooks.extend(
                record
                    .actions()
                    .iter()
                    .map(|action| action.target_id().to_owned()),
            );
        }

        summary
    }

    /// Returns the number of flagged rules.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns flagged rule counts keyed by severity.
    #[must_use]
    pub fn by_severity(&self) -> &BTreeMap<String, usize> {
        &self.by_severity
    }

    /// Returns the distinct playbook ids, sorted.
    #[must_use]
    pub fn playbooks(&self) -> &BTreeSet<String> {
        &self.playbooks
    }

    /// Renders the summary as plain text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![format!("Total rules requiring migration: {}", self.total)];

        if !self.by_severity.is_empty() {
            lines.push(String::new());
            lines.push("Breakdown by severity:".to_owned());
            for (severity, count) in &self.by_severity {
                lines.push(format!("  {severity}: {count} rule(s)"));
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "Unique playbooks requiring migration: {}",
            self.playbooks.len()
        ));
        for playbook in &self.playbooks {
            lines.push(format!("  - {playbook}"));
        }

        lines.join("\n")
    }
}
