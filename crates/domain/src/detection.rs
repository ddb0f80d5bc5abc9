use sentinel_detect_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{AnalyticRule, RuleAction, TriggerStatus};

/// Date after which classic automation stops running.
pub const MIGRATION_DEADLINE: &str = "2026-03-31";

/// One classic action as it appears in a detection record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDetail {
    action_id: String,
    #[serde(rename = "logic_app_resource_id")]
    target_id: String,
    #[serde(rename = "trigger_uri")]
    trigger_status: TriggerStatus,
}

impl ActionDetail {
    /// Returns the action resource name.
    #[must_use]
    pub fn action_id(&self) -> &str {
        self.action_id.as_str()
    }

    /// Returns the playbook resource id the action points at.
    #[must_use]
    pub fn target_id(&self) -> &str {
        self.target_id.as_str()
    }

    /// Returns whether a trigger endpoint is configured.
    #[must_use]
    pub fn trigger_status(&self) -> TriggerStatus {
        self.trigger_status
    }
}

impl From<&RuleAction> for ActionDetail {
    fn from(action: &RuleAction) -> Self {
        Self {
            action_id: action.name().to_owned(),
            target_id: action.logic_app_resource_id().to_owned(),
            trigger_status: action.trigger_status(),
        }
    }
}

/// Analytic rule that still relies on classic automation and must migrate.
///
/// Records only exist for rules with at least one attached action, so
/// `migration_required` is always true and `action_count` always equals the
/// number of listed actions. Both are re-checked on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DetectionRecordWire")]
pub struct DetectionRecord {
    workspace_name: String,
    resource_group: String,
    rule_id: String,
    rule_display_name: String,
    rule_type: String,
    enabled: bool,
    severity: String,
    #[serde(rename = "classic_automation_count")]
    action_count: usize,
    actions: Vec<ActionDetail>,
    migration_required: bool,
    migration_deadline: String,
}

impl DetectionRecord {
    /// Builds the record for a rule and its attached classic actions.
    pub fn new(
        workspace_name: impl Into<String>,
        resource_group: impl Into<String>,
        rule: &AnalyticRule,
        actions: &[RuleAction],
    ) -> AppResult<Self> {
        if actions.is_empty() {
            return Err(AppError::Validation(format!(
                "rule '{}' has no classic automation actions",
                rule.name()
            )));
        }

        Ok(Self {
            workspace_name: workspace_name.into(),
            resource_group: resource_group.into(),
            rule_id: rule.name().as_str().to_owned(),
            rule_display_name: rule.display_name().to_owned(),
            rule_type: rule.kind().to_owned(),
            enabled: rule.enabled(),
            severity: rule.severity().to_owned(),
            action_count: actions.len(),
            actions: actions.iter().map(ActionDetail::from).collect(),
            migration_required: true,
            migration_deadline: MIGRATION_DEADLINE.to_owned(),
        })
    }

    /// Returns the workspace name.
    #[must_use]
    pub fn workspace_name(&self) -> &str {
        self.workspace_name.as_str()
    }

    /// Returns the workspace resource group.
    #[must_use]
    pub fn resource_group(&self) -> &str {
        self.resource_group.as_str()
    }

    /// Returns the rule resource name.
    #[must_use]
    pub fn rule_id(&self) -> &str {
        self.rule_id.as_str()
    }

    /// Returns the rule display name.
    #[must_use]
    pub fn rule_display_name(&self) -> &str {
        self.rule_display_name.as_str()
    }

    /// Returns the rule kind.
    #[must_use]
    pub fn rule_type(&self) -> &str {
        self.rule_type.as_str()
    }

    /// Returns whether the rule is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the rule severity.
    #[must_use]
    pub fn severity(&self) -> &str {
        self.severity.as_str()
    }

    /// Returns the number of classic actions.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Returns the classic actions in upstream order.
    #[must_use]
    pub fn actions(&self) -> &[ActionDetail] {
        self.actions.as_slice()
    }

    /// Always true for an existing record.
    #[must_use]
    pub fn migration_required(&self) -> bool {
        self.migration_required
    }

    /// Returns the migration deadline date.
    #[must_use]
    pub fn migration_deadline(&self) -> &str {
        self.migration_deadline.as_str()
    }

    /// Returns the playbook ids joined with `", "`.
    #[must_use]
    pub fn joined_target_ids(&self) -> String {
        self.actions
            .iter()
            .map(ActionDetail::target_id)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Deserialize)]
struct DetectionRecordWire {
    workspace_name: String,
    resource_group: String,
    rule_id: String,
    rule_display_name: String,
    rule_type: String,
    enabled: bool,
    severity: String,
    classic_automation_count: usize,
    actions: Vec<ActionDetail>,
    migration_required: bool,
    migration_deadline: String,
}

impl TryFrom<DetectionRecordWire> for DetectionRecord {
    type Error = AppError;

    fn try_from(wire: DetectionRecordWire) -> Result<Self, Self::Error> {
        if wire.actions.is_empty() {
            return Err(AppError::Validation(format!(
                "detection record for rule '{}' lists no actions",
                wire.rule_id
            )));
        }

        if wire.classic_automation_count != wire.actions.len() {
            return Err(AppError::Validation(format!(
                "detection record for rule '{}' counts {} actions but lists {}",
                wire.rule_id,
                wire.classic_automation_count,
                wire.actions.len()
            )));
        }

        if !wire.migration_required {
            return Err(AppError::Validation(format!(
                "detection record for rule '{}' must require migration",
                wire.rule_id
            )));
        }

        Ok(Self {
            workspace_name: wire.workspace_name,
            resource_group: wire.resource_group,
            rule_id: wire.rule_id,
            rule_display_name: wire.rule_display_name,
            rule_type: wire.rule_type,
            enabled: wire.enabled,
            severity: wire.severity,
            action_count: wire.classic_automation_count,
            actions: wire.actions,
            migration_required: wire.migration_required,
            migration_deadline: wire.migration_deadline,
        })
    }
}
