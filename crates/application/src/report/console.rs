use chrono::{DateTime, Utc};
use sentinel_detect_domain::DetectionRecord;

use super::display_bool;

/// Console output when no rule needs migration.
pub const NO_RESULTS_CONSOLE: &str = "\n✅ No analytic rules with classic automation found.\n";

const MIGRATION_GUIDE_URL: &str =
    "https://learn.microsoft.com/azure/sentinel/automation/migrate-playbooks-to-automation-rules";

/// Renders the human-readable report, grouping records by workspace in
/// first-seen order.
#[must_use]
pub fn render_console(records: &[DetectionRecord], generated_at: DateTime<Utc>) -> String {
    if records.is_empty() {
        return NO_RESULTS_CONSOLE.to_owned();
    }

    let banner = "=".repeat(80);
    let mut lines = vec![
        format!("\n{banner}"),
        "MICROSOFT SENTINEL CLASSIC AUTOMATION DETECTION REPORT".to_owned(),
        banner.clone(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Total Rules with Classic Automation: {}", records.len()),
        format!("{banner}\n"),
    ];

    for (workspace_key, workspace_records) in group_by_workspace(records) {
        lines.push(format!("\n📊 Workspace: {workspace_key}"));
        lines.push(format!(
            "   Rules requiring migration: {}",
            workspace_records.len()
        ));
        lines.push("-".repeat(80));

        for (index, record) in workspace_records.iter().enumerate() {
            lines.push(format!("\n  [{}] {}", index + 1, record.rule_display_name()));
            lines.push(format!("      Rule ID: {}", record.rule_id()));
            lines.push(format!("      Type: {}", record.rule_type()));
            lines.push(format!("      Severity: {}", record.severity()));
            lines.push(format!("      Enabled: {}", display_bool(record.enabled())));
            lines.push(format!(
                "      Classic Automations: {}",
                record.action_count()
            ));

            if !record.actions().is_empty() {
                lines.push("      Playbooks:".to_owned());
                for action in record.actions() {
                    lines.push(format!(
                        "        - {} (trigger: {})",
                        action.target_id(),
                        action.trigger_status().as_str()
                    ));
                }
            }

            lines.push(format!(
                "      ⚠️  Migration Required by: {}",
                record.migration_deadline()
            ));
        }
    }

    lines.push(format!("\n{banner}"));
    lines.push("MIGRATION RECOMMENDATIONS".to_owned());
    lines.push(banner.clone());
    lines.push("1. Review the official migration guide:".to_owned());
    lines.push(format!("   {MIGRATION_GUIDE_URL}"));
    lines.push("2. Create automation rules to replace classic automation".to_owned());
    lines.push("3. Test the new automation rules thoroughly".to_owned());
    lines.push("4. Remove classic automation from analytic rules".to_owned());
    lines.push("5. Complete migration before March 31, 2026".to_owned());
    lines.push(format!("{banner}\n"));

    lines.join("\n")
}

fn group_by_workspace(records: &[DetectionRecord]) -> Vec<(String, Vec<&DetectionRecord>)> {
    let mut groups: Vec<(String, Vec<&DetectionRecord>)> = Vec::new();

    for record in records {
        let key = format!("{} ({})", record.workspace_name(), record.resource_group());
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(record),
            None => groups.push((key, vec![record])),
        }
    }

    groups
}
