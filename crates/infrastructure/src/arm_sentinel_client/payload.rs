use sentinel_detect_core::AppResult;
use sentinel_detect_domain::{
    AnalyticRule, AnalyticRuleInput, RuleAction, UNKNOWN_VALUE, Workspace,
};
use serde::Deserialize;

pub(super) const WORKSPACE_RESOURCE_TYPE: &str = "Microsoft.OperationalInsights/workspaces";

/// One page of an ARM list response.
#[derive(Debug, Deserialize)]
pub(super) struct ArmListPage<T> {
    #[serde(default = "Vec::new")]
    pub(super) value: Vec<T>,
    #[serde(rename = "nextLink")]
    pub(super) next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenericResourcePayload {
    id: String,
    name: String,
    #[serde(rename = "type")]
    resource_type: Option<String>,
    location: Option<String>,
}

impl GenericResourcePayload {
    pub(super) fn is_workspace(&self) -> bool {
        self.resource_type
            .as_deref()
            .is_none_or(|resource_type| resource_type.eq_ignore_ascii_case(WORKSPACE_RESOURCE_TYPE))
    }

    pub(super) fn into_workspace(self) -> AppResult<Workspace> {
        Workspace::from_resource_id(self.id, self.name, self.location)
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AlertRulePayload {
    name: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    properties: AlertRuleProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertRuleProperties {
    display_name: Option<String>,
    enabled: Option<bool>,
    severity: Option<String>,
}

impl AlertRulePayload {
    /// Rules listed without a resource name are kept under `Unknown`; their
    /// action lookup then reports not found.
    pub(super) fn into_rule(self) -> AppResult<AnalyticRule> {
        AnalyticRule::new(AnalyticRuleInput {
            name: self
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_VALUE.to_owned()),
            kind: self.kind,
            display_name: self.properties.display_name,
            enabled: self.properties.enabled,
            severity: self.properties.severity,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ActionPayload {
    name: Option<String>,
    #[serde(default)]
    properties: ActionProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionProperties {
    logic_app_resource_id: Option<String>,
    trigger_uri: Option<String>,
}

impl ActionPayload {
    pub(super) fn into_action(self) -> RuleAction {
        RuleAction::new(
            self.name,
            self.properties.logic_app_resource_id,
            self.properties.trigger_uri.as_deref(),
        )
    }
}
