use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use tokio::sync::Mutex;

use sentinel_detect_core::{AppError, AppResult};
use sentinel_detect_domain::{AnalyticRule, AnalyticRuleInput, RuleAction, Workspace};

use crate::{ActionLookup, AnalyticRuleSource, WorkspaceInventory};

use super::{ScanService, ScanTarget};

enum FakeActions {
    Found(Vec<RuleAction>),
    NotFound,
    Failing,
}

#[derive(Default)]
struct FakeInventory {
    workspaces: Vec<Workspace>,
    fail: bool,
}

#[async_trait]
impl WorkspaceInventory for FakeInventory {
    async fn list_workspaces(&self) -> AppResult<Vec<Workspace>> {
        if self.fail {
            return Err(AppError::Authentication("token rejected".to_owned()));
        }

        Ok(self.workspaces.clone())
    }
}

#[derive(Default)]
struct FakeRuleSource {
    rules: HashMap<(String, String), Vec<AnalyticRule>>,
    actions: HashMap<String, FakeActions>,
    failing_workspaces: Vec<String>,
    action_calls: Mutex<Vec<String>>,
}

#[async_trait]
impl AnalyticRuleSource for FakeRuleSource {
    async fn list_rules(
        &self,
        resource_group: &str,
        workspace_name: &str,
    ) -> AppResult<Vec<AnalyticRule>> {
        if self
            .failing_workspaces
            .iter()
            .any(|name| name == workspace_name)
        {
            return Err(AppError::Api(format!(
                "alert rule listing failed for '{workspace_name}'"
            )));
        }

        Ok(self
            .rules
            .get(&(resource_group.to_owned(), workspace_name.to_owned()))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_rule_actions(
        &self,
        _resource_group: &str,
        _workspace_name: &str,
        rule_id: &str,
    ) -> AppResult<ActionLookup> {
        self.action_calls.lock().await.push(rule_id.to_owned());

        match self.actions.get(rule_id) {
            Some(FakeActions::Found(actions)) => Ok(ActionLookup::Found(actions.clone())),
            Some(FakeActions::NotFound) => Ok(ActionLookup::NotFound),
            Some(FakeActions::Failing) => Err(AppError::Api("status 500".to_owned())),
            None => Ok(ActionLookup::Found(Vec::new())),
        }
    }
}

fn workspace(resource_group: &str, name: &str) -> Workspace {
    Workspace::from_resource_id(
        format!(
            "/subscriptions/12345678-1234-1234-1234-123456789012/resourceGroups/{resource_group}/providers/Microsoft.OperationalInsights/workspaces/{name}"
        ),
        name,
        Some("eastus".to_owned()),
    )
    .unwrap_or_else(|_| unreachable!())
}

fn rule(name: &str) -> AnalyticRule {
    AnalyticRule::new(AnalyticRuleInput {
        name: name.to_owned(),
        kind: Some("Scheduled".to_owned()),
        display_name: Some(format!("Display {name}")),
        enabled: Some(true),
        severity: Some("High".to_owned()),
    })
    .unwrap_or_else(|_| unreachable!())
}

fn playbook(name: &str) -> RuleAction {
    RuleAction::new(
        Some(name.to_owned()),
        Some(format!(
            "/subscriptions/abc/resourceGroups/rg/providers/Microsoft.Logic/workflows/{name}"
        )),
        None,
    )
}

fn build_service(inventory: FakeInventory, rule_source: Arc<FakeRuleSource>) -> ScanService {
    ScanService::new(Arc::new(inventory), rule_source)
}

#[tokio::test]
async fn scan_flags_only_rules_with_actions() {
    let mut rule_source = FakeRuleSource::default();
    rule_source.rules.insert(
        ("sentinel-rg".to_owned(), "sentinel-ws".to_owned()),
        vec![rule("with-actions"), rule("without-actions")],
    );
    rule_source.actions.insert(
        "with-actions".to_owned(),
        FakeActions::Found(vec![playbook("enrich"), playbook("notify")]),
    );
    let rule_source = Arc::new(rule_source);
    let service = build_service(FakeInventory::default(), rule_source.clone());

    let records = service
        .scan("sentinel-rg", "sentinel-ws")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rule_id(), "with-actions");
    assert_eq!(records[0].action_count(), 2);
    assert_eq!(records[0].workspace_name(), "sentinel-ws");
    assert_eq!(records[0].resource_group(), "sentinel-rg");
    assert_eq!(
        *rule_source.action_calls.lock().await,
        vec!["with-actions".to_owned(), "without-actions".to_owned()]
    );
}

#[tokio::test]
async fn scan_of_workspace_without_rules_is_empty() {
    let service = build_service(
        FakeInventory::default(),
        Arc::new(FakeRuleSource::default()),
    );

    let records = service
        .scan("sentinel-rg", "empty-ws")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(records.is_empty());
}

#[tokio::test]
async fn not_found_and_failing_lookups_count_as_zero_actions() {
    let mut rule_source = FakeRuleSource::default();
    rule_source.rules.insert(
        ("rg".to_owned(), "ws".to_owned()),
        vec![rule("missing"), rule("broken"), rule("flagged")],
    );
    rule_source
        .actions
        .insert("missing".to_owned(), FakeActions::NotFound);
    rule_source
        .actions
        .insert("broken".to_owned(), FakeActions::Failing);
    rule_source.actions.insert(
        "flagged".to_owned(),
        FakeActions::Found(vec![playbook("isolate")]),
    );
    let service = build_service(FakeInventory::default(), Arc::new(rule_source));

    let records = service
        .scan("rg", "ws")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].rule_id(), "flagged");
}

#[tokio::test]
async fn rule_listing_failure_aborts_scan() {
    let rule_source = FakeRuleSource {
        failing_workspaces: vec!["ws".to_owned()],
        ..FakeRuleSource::default()
    };
    let service = build_service(FakeInventory::default(), Arc::new(rule_source));

    let result = service.scan("rg", "ws").await;

    assert!(matches!(result, Err(AppError::Api(_))));
}

#[tokio::test]
async fn scan_all_concatenates_in_enumeration_order() {
    let mut rule_source = FakeRuleSource::default();
    rule_source
        .rules
        .insert(("rg-b".to_owned(), "ws-b".to_owned()), vec![rule("rule-b")]);
    rule_source
        .rules
        .insert(("rg-a".to_owned(), "ws-a".to_owned()), vec![rule("rule-a")]);
    rule_source.actions.insert(
        "rule-a".to_owned(),
        FakeActions::Found(vec![playbook("a")]),
    );
    rule_source.actions.insert(
        "rule-b".to_owned(),
        FakeActions::Found(vec![playbook("b")]),
    );
    let inventory = FakeInventory {
        workspaces: vec![workspace("rg-b", "ws-b"), workspace("rg-a", "ws-a")],
        fail: false,
    };
    let service = build_service(inventory, Arc::new(rule_source));

    let records = service
        .scan_target(&ScanTarget::AllWorkspaces)
        .await
        .unwrap_or_else(|_| unreachable!());

    let rule_ids: Vec<&str> = records.iter().map(|record| record.rule_id()).collect();
    assert_eq!(rule_ids, vec!["rule-b", "rule-a"]);
}

#[tokio::test]
async fn inventory_failure_is_fatal() {
    let inventory = FakeInventory {
        workspaces: Vec::new(),
        fail: true,
    };
    let service = build_service(inventory, Arc::new(FakeRuleSource::default()));

    let result = service.scan_all().await;

    assert!(matches!(result, Err(AppError::Authentication(_))));
}

#[tokio::test]
async fn explicit_target_skips_inventory() {
    let inventory = FakeInventory {
        workspaces: Vec::new(),
        fail: true,
    };
    let service = build_service(inventory, Arc::new(FakeRuleSource::default()));

    let result = service
        .scan_target(&ScanTarget::Workspace {
            resource_group: "rg".to_owned(),
            workspace_name: "ws".to_owned(),
        })
        .await;

    assert!(matches!(result, Ok(records) if records.is_empty()));
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap_or_else(|_| unreachable!())
        .block_on(future)
}

proptest! {
    #[test]
    fn record_exists_iff_rule_has_actions(action_counts in proptest::collection::vec(0_usize..4, 0..12)) {
        let mut rule_source = FakeRuleSource::default();
        let rules: Vec<AnalyticRule> = (0..action_counts.len())
            .map(|index| rule(&format!("rule-{index}")))
            .collect();
        rule_source
            .rules
            .insert(("rg".to_owned(), "ws".to_owned()), rules);
        for (index, count) in action_counts.iter().enumerate() {
            let actions = (0..*count)
                .map(|action_index| playbook(&format!("p{index}-{action_index}")))
                .collect();
            rule_source
                .actions
                .insert(format!("rule-{index}"), FakeActions::Found(actions));
        }
        let service = build_service(FakeInventory::default(), Arc::new(rule_source));

        let records = block_on(service.scan("rg", "ws")).unwrap_or_else(|_| unreachable!());

        let expected: Vec<String> = action_counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(index, _)| format!("rule-{index}"))
            .collect();
        let flagged: Vec<String> = records
            .iter()
            .map(|record| record.rule_id().to_owned())
            .collect();
        prop_assert_eq!(flagged, expected);
        for record in &records {
            prop_assert_eq!(record.action_count(), record.actions().len());
        }
    }
}
