use async_trait::async_trait;
use reqwest::{StatusCode, header};
use sentinel_detect_application::{ActionLookup, AnalyticRuleSource, WorkspaceInventory};
use sentinel_detect_core::{AccessToken, AppError, AppResult, SubscriptionId};
use sentinel_detect_domain::{AnalyticRule, Workspace};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

mod payload;


use payload::{
    ActionPayload, AlertRulePayload, ArmListPage, GenericResourcePayload, WORKSPACE_RESOURCE_TYPE,
};

const MAX_PAGES: usize = 1_000;

/// Connection settings for the Azure Resource Manager adapter.
#[derive(Debug, Clone)]
pub struct ArmClientConfig {
    /// Management endpoint, e.g. `https://management.azure.com`.
    pub endpoint: Url,
    /// Subscription the scan runs under.
    pub subscription_id: SubscriptionId,
    /// Restricts workspace discovery to one resource group.
    pub inventory_resource_group: Option<String>,
    /// `api-version` for the generic resources endpoint.
    pub resources_api_version: String,
    /// `api-version` for the Security Insights endpoints.
    pub security_insights_api_version: String,
}

/// Azure Resource Manager implementation of the workspace inventory and
/// analytic rule ports.
pub struct ArmSentinelClient {
    http_client: reqwest::Client,
    config: ArmClientConfig,
    token: AccessToken,
}

impl ArmSentinelClient {
    /// Creates a client that authenticates every call with `token`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: ArmClientConfig, token: AccessToken) -> Self {
        Self {
            http_client,
            config,
            token,
        }
    }

    fn workspaces_url(&self) -> AppResult<Url> {
        let subscription_id = self.config.subscription_id.to_string();
        let mut segments = vec!["subscriptions", subscription_id.as_str()];
        if let Some(resource_group) = self.config.inventory_resource_group.as_deref() {
            segments.extend(["resourceGroups", resource_group]);
        }
        segments.push("resources");

        let filter = format!("resourceType eq '{WORKSPACE_RESOURCE_TYPE}'");
        self.arm_url(
            &segments,
            &[
                ("$filter", filter.as_str()),
                ("api-version", self.config.resources_api_version.as_str()),
            ],
        )
    }

    fn alert_rules_url(
        &self,
        resource_group: &str,
        workspace_name: &str,
        rule_actions_of: Option<&str>,
    ) -> AppResult<Url> {
        let subscription_id = self.config.subscription_id.to_string();
        let mut segments = vec![
            "subscriptions",
            subscription_id.as_str(),
            "resourceGroups",
            resource_group,
            "providers",
            "Microsoft.OperationalInsights",
            "workspaces",
            workspace_name,
            "providers",
            "Microsoft.SecurityInsights",
            "alertRules",
        ];
        if let Some(rule_id) = rule_actions_of {
            segments.extend([rule_id, "actions"]);
        }

        self.arm_url(
            &segments,
            &[(
                "api-version",
                self.config.security_insights_api_version.as_str(),
            )],
        )
    }

    fn arm_url(&self, segments: &[&str], query: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self.config.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "management endpoint '{}' cannot be used as a base URL",
                    self.config.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().extend_pairs(query);

        Ok(url)
    }

    async fn list_all<T: DeserializeOwned>(
        &self,
        first_page: Url,
        what: &str,
    ) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next_page = Some(first_page);
        let mut pages = 0_usize;

        while let Some(url) = next_page.take() {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(AppError::Api(format!(
                    "{what} returned more than {MAX_PAGES} pages"
                )));
            }

            let page = self.get_json::<ArmListPage<T>>(url, what).await?;
            items.extend(page.value);
            next_page = self.next_page_url(page.next_link.as_deref())?;
        }

        Ok(items)
    }

    fn next_page_url(&self, next_link: Option<&str>) -> AppResult<Option<Url>> {
        let Some(next_link) = next_link.filter(|link| !link.trim().is_empty()) else {
            return Ok(None);
        };

        let url = Url::parse(next_link).map_err(|error| {
            AppError::Api(format!("invalid nextLink '{next_link}': {error}"))
        })?;

        // The bearer token is only ever sent to the configured endpoint.
        if url.origin() != self.config.endpoint.origin() {
            return Err(AppError::Api(format!(
                "nextLink '{next_link}' points outside the management endpoint"
            )));
        }

        Ok(Some(url))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> AppResult<T> {
        debug!(url = %url, "calling management API");
        let response = self
            .http_client
            .get(url)
            .header(header::AUTHORIZATION, self.token.bearer_header())
            .send()
            .await
            .map_err(|error| AppError::Api(format!("failed to call {what}: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(status_error(status, what, body.as_str()));
        }

        response.json::<T>().await.map_err(|error| {
            AppError::Api(format!("failed to parse {what} response body: {error}"))
        })
    }
}

fn status_error(status: StatusCode, what: &str, body: &str) -> AppError {
    let message = format!("{what} returned status {}: {body}", status.as_u16());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Authentication(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Api(message),
    }
}

#[async_trait]
impl WorkspaceInventory for ArmSentinelClient {
    async fn list_workspaces(&self) -> AppResult<Vec<Workspace>> {
        let resources = self
            .list_all::<GenericResourcePayload>(self.workspaces_url()?, "resource listing")
            .await?;

        resources
            .into_iter()
            .filter(GenericResourcePayload::is_workspace)
            .map(GenericResourcePayload::into_workspace)
            .collect()
    }
}

#[async_trait]
impl AnalyticRuleSource for ArmSentinelClient {
    async fn list_rules(
        &self,
        resource_group: &str,
        workspace_name: &str,
    ) -> AppResult<Vec<AnalyticRule>> {
        let url = self.alert_rules_url(resource_group, workspace_name, None)?;
        let rules = self
            .list_all::<AlertRulePayload>(url, "alert rule listing")
            .await?;

        rules.into_iter().map(AlertRulePayload::into_rule).collect()
    }

    async fn list_rule_actions(
        &self,
        resource_group: &str,
        workspace_name: &str,
        rule_id: &str,
    ) -> AppResult<ActionLookup> {
        let url = self.alert_rules_url(resource_group, workspace_name, Some(rule_id))?;

        match self
            .list_all::<ActionPayload>(url, "alert rule action listing")
            .await
        {
            Ok(actions) => Ok(ActionLookup::Found(
                actions.into_iter().map(ActionPayload::into_action).collect(),
            )),
            Err(AppError::NotFound(_)) => Ok(ActionLookup::NotFound),
            Err(error) => Err(error),
        }
    }
}
