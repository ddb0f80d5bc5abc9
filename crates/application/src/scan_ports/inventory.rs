use async_trait::async_trait;
use sentinel_detect_core::AppResult;
use sentinel_detect_domain::Workspace;

/// Resource inventory port listing security-analytics workspaces.
#[async_trait]
pub trait WorkspaceInventory: Send + Sync {
    /// Lists every workspace visible in the configured scope, in upstream order.
    async fn list_workspaces(&self) -> AppResult<Vec<Workspace>>;
}
