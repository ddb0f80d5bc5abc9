use async_trait::async_trait;
use sentinel_detect_core::AppResult;
use sentinel_detect_domain::{AnalyticRule, RuleAction};

/// Outcome of listing the classic actions attached to one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionLookup {
    /// The rule exists and these actions are attached (possibly none).
    Found(Vec<RuleAction>),
    /// Upstream reported the rule's action collection as not found.
    NotFound,
}

impl ActionLookup {
    /// Collapses the outcome into the attached actions.
    #[must_use]
    pub fn into_actions(self) -> Vec<RuleAction> {
        match self {
            Self::Found(actions) => actions,
            Self::NotFound => Vec::new(),
        }
    }
}

/// Port for analytic rules and their classic automation actions.
#[async_trait]
pub trait AnalyticRuleSource: Send + Sync {
    /// Lists analytic rules for a workspace in upstream order.
    async fn list_rules(
        &self,
        resource_group: &str,
        workspace_name: &str,
    ) -> AppResult<Vec<AnalyticRule>>;

    /// Lists classic actions attached to one rule.
    async fn list_rule_actions(
        &self,
        resource_group: &str,
        workspace_name: &str,
        rule_id: &str,
    ) -> AppResult<ActionLookup>;
}
