use async_trait::async_trait;
use sentinel_detect_core::{AccessToken, AppResult};

/// Port that produces the bearer token handed to management API adapters.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Short name used in logs and chained error messages.
    fn name(&self) -> &'static str;

    /// Resolves an access token for the management API.
    async fn resolve(&self) -> AppResult<AccessToken>;
}
