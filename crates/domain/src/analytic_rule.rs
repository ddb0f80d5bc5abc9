use sentinel_detect_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Placeholder used when the upstream payload omits a projected field.
pub const UNKNOWN_VALUE: &str = "Unknown";

/// Raw values for constructing an analytic rule projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticRuleInput {
    /// Rule resource name, used as the rule id in follow-up calls.
    pub name: String,
    /// Rule kind such as `Scheduled`, `Fusion` or `NRT`.
    pub kind: Option<String>,
    /// Human-readable rule name.
    pub display_name: Option<String>,
    /// Whether the rule is enabled.
    pub enabled: Option<bool>,
    /// Rule severity label.
    pub severity: Option<String>,
}

/// Analytic rule fields projected from the upstream rule payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticRule {
    name: NonEmptyString,
    kind: String,
    display_name: String,
    enabled: bool,
    severity: String,
}

impl AnalyticRule {
    /// Creates a rule projection, filling absent optional fields with
    /// [`UNKNOWN_VALUE`] and treating a missing enabled flag as disabled.
    pub fn new(input: AnalyticRuleInput) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(input.name)?,
            kind: or_unknown(input.kind),
            display_name: or_unknown(input.display_name),
            enabled: input.enabled.unwrap_or(false),
            severity: or_unknown(input.severity),
        })
    }

    /// Returns the rule resource name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the rule kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns whether the rule is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the severity label.
    #[must_use]
    pub fn severity(&self) -> &str {
        self.severity.as_str()
    }
}

/// Whether a classic action carries a trigger endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerStatus {
    /// A trigger URI is configured on the action.
    #[serde(rename = "Configured")]
    Configured,
    /// No trigger URI was reported.
    #[serde(rename = "Not configured")]
    NotConfigured,
}

impl TriggerStatus {
    /// Derives the status from an optional trigger URI.
    #[must_use]
    pub fn from_trigger_uri(trigger_uri: Option<&str>) -> Self {
        match trigger_uri {
            Some(uri) if !uri.trim().is_empty() => Self::Configured,
            _ => Self::NotConfigured,
        }
    }

    /// Returns the report label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configured => "Configured",
            Self::NotConfigured => "Not configured",
        }
    }
}

/// Classic automation action attached directly to an analytic rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleAction {
    name: String,
    logic_app_resource_id: String,
    trigger_status: TriggerStatus,
}

impl RuleAction {
    /// Creates an action projection; absent identifiers become [`UNKNOWN_VALUE`].
    #[must_use]
    pub fn new(
        name: Option<String>,
        logic_app_resource_id: Option<String>,
        trigger_uri: Option<&str>,
    ) -> Self {
        Self {
            name: or_unknown(name),
            logic_app_resource_id: or_unknown(logic_app_resource_id),
            trigger_status: TriggerStatus::from_trigger_uri(trigger_uri),
        }
    }

    /// Returns the action resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the linked playbook resource id.
    #[must_use]
    pub fn logic_app_resource_id(&self) -> &str {
        self.logic_app_resource_id.as_str()
    }

    /// Returns the trigger status.
    #[must_use]
    pub fn trigger_status(&self) -> TriggerStatus {
        self.trigger_status
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_VALUE.to_owned())
}
