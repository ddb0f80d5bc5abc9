//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod analytic_rule;
mod detection;
mod workspace;

pub use analytic_rule::{AnalyticRule, AnalyticRuleInput, RuleAction, TriggerStatus, UNKNOWN_VALUE};
pub use detection::{ActionDetail, DetectionRecord, MIGRATION_DEADLINE};
pub use workspace::{Workspace, resource_group_from_id};
