use sentinel_detect_domain::DetectionRecord;

use super::display_bool;

/// CSV output when no rule needs migration.
pub const NO_RESULTS_CSV: &str = "No results found";

/// Column order of the tabular report.
pub const CSV_COLUMNS: [&str; 11] = [
    "workspace_name",
    "resource_group",
    "rule_id",
    "rule_display_name",
    "rule_type",
    "enabled",
    "severity",
    "classic_automation_count",
    "playbook_resource_ids",
    "migration_required",
    "migration_deadline",
];

const ROW_TERMINATOR: &str = "\r\n";

/// Renders one CSV row per record with playbook ids flattened into one cell.
#[must_use]
pub fn render_csv(records: &[DetectionRecord]) -> String {
    if records.is_empty() {
        return NO_RESULTS_CSV.to_owned();
    }

    let mut output = String::new();
    push_row(&mut output, CSV_COLUMNS.iter().map(|column| (*column).to_owned()));

    for record in records {
        push_row(
            &mut output,
            [
                record.workspace_name().to_owned(),
                record.resource_group().to_owned(),
                record.rule_id().to_owned(),
                record.rule_display_name().to_owned(),
                record.rule_type().to_owned(),
                display_bool(record.enabled()).to_owned(),
                record.severity().to_owned(),
                record.action_count().to_string(),
                record.joined_target_ids(),
                display_bool(record.migration_required()).to_owned(),
                record.migration_deadline().to_owned(),
            ],
        );
    }

    output
}

fn push_row(output: &mut String, cells: impl IntoIterator<Item = String>) {
    let row = cells
        .into_iter()
        .map(|cell| escape_cell(&cell))
        .collect::<Vec<_>>()
        .join(",");
    output.push_str(row.as_str());
    output.push_str(ROW_TERMINATOR);
}

fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::escape_cell;

    #[test]
    fn cells_with_separators_are_quoted() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("a, b"), "\"a, b\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("two\nlines"), "\"two\nlines\"");
    }
}
