use std::sync::Arc;

use sentinel_detect_core::AppResult;
use sentinel_detect_domain::{AnalyticRule, DetectionRecord, RuleAction};
use tracing::{debug, info, warn};

use crate::scan_ports::{ActionLookup, AnalyticRuleSource, WorkspaceInventory};

#[cfg(test)]
mod tests;

/// What a scan run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// Every workspace the inventory returns.
    AllWorkspaces,
    /// One explicitly named workspace.
    Workspace {
        /// Resource group containing the workspace.
        resource_group: String,
        /// Workspace name.
        workspace_name: String,
    },
}

/// Application service that finds analytic rules still using classic automation.
#[derive(Clone)]
pub struct ScanService {
    inventory: Arc<dyn WorkspaceInventory>,
    rule_source: Arc<dyn AnalyticRuleSource>,
}

impl ScanService {
    /// Creates a scan service from inventory and rule source implementations.
    #[must_use]
    pub fn new(
        inventory: Arc<dyn WorkspaceInventory>,
        rule_source: Arc<dyn AnalyticRuleSource>,
    ) -> Self {
        Self {
            inventory,
            rule_source,
        }
    }

    /// Runs the scan described by `target`.
    pub async fn scan_target(&self, target: &ScanTarget) -> AppResult<Vec<DetectionRecord>> {
        match target {
            ScanTarget::AllWorkspaces => self.scan_all().await,
            ScanTarget::Workspace {
                resource_group,
                workspace_name,
            } => self.scan(resource_group, workspace_name).await,
        }
    }

    /// Scans every inventoried workspace, concatenating results in
    /// enumeration order.
    pub async fn scan_all(&self) -> AppResult<Vec<DetectionRecord>> {
        info!("discovering sentinel workspaces");
        let workspaces = self.inventory.list_workspaces().await?;
        info!(workspace_count = workspaces.len(), "found workspaces to scan");

        let mut records = Vec::new();
        for workspace in &workspaces {
            let workspace_records = self
                .scan(
                    workspace.resource_group().as_str(),
                    workspace.name().as_str(),
                )
                .await?;
            records.extend(workspace_records);
        }

        Ok(records)
    }

    /// Scans one workspace. Rule listing failures abort; action lookup
    /// failures only drop that rule's actions.
    pub async fn scan(
        &self,
        resource_group: &str,
        workspace_name: &str,
    ) -> AppResult<Vec<DetectionRecord>> {
        info!(
            workspace = %workspace_name,
            resource_group = %resource_group,
            "scanning workspace"
        );

        let rules = self
            .rule_source
            .list_rules(resource_group, workspace_name)
            .await?;
        info!(
            workspace = %workspace_name,
            rule_count = rules.len(),
            "found alert rules"
        );

        let mut records = Vec::new();
        for rule in &rules {
            let actions = self
                .attached_actions(resource_group, workspace_name, rule)
                .await;
            if actions.is_empty() {
                continue;
            }

            records.push(DetectionRecord::new(
                workspace_name,
                resource_group,
                rule,
                &actions,
            )?);
        }

        info!(
            workspace = %workspace_name,
            flagged_count = records.len(),
            "found rules with classic automation"
        );

        Ok(records)
    }

    async fn attached_actions(
        &self,
        resource_group: &str,
        workspace_name: &str,
        rule: &AnalyticRule,
    ) -> Vec<RuleAction> {
        let rule_id = rule.name().as_str();
        match self
            .rule_source
            .list_rule_actions(resource_group, workspace_name, rule_id)
            .await
        {
            Ok(ActionLookup::NotFound) => {
                debug!(rule_id = %rule_id, "rule has no action collection");
                Vec::new()
            }
            Ok(lookup) => lookup.into_actions(),
            Err(error) => {
                warn!(
                    workspace = %workspace_name,
                    rule_id = %rule_id,
                    error = %error,
                    "failed to retrieve actions for rule"
                );
                Vec::new()
            }
        }
    }
}
