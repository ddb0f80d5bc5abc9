use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sentinel_detect_application::CredentialResolver;
use sentinel_detect_core::{AccessToken, AppError, AppResult};
use tracing::{debug, info};

/// Tries several credential resolvers in order and keeps the first token.
pub struct ChainedCredential {
    resolvers: Vec<Arc<dyn CredentialResolver>>,
}

impl ChainedCredential {
    /// Creates a chain; resolvers are attempted in the given order.
    #[must_use]
    pub fn new(resolvers: Vec<Arc<dyn CredentialResolver>>) -> Self {
        Self { resolvers }
    }
}

#[async_trait]
impl CredentialResolver for ChainedCredential {
    fn name(&self) -> &'static str {
        "chained"
    }

    async fn resolve(&self) -> AppResult<AccessToken> {
        let mut failures = Vec::new();
        let now = Utc::now().timestamp();

        for resolver in &self.resolvers {
            match resolver.resolve().await {
                Ok(token) if token.is_expired_at(now) => {
                    debug!(
                        credential = resolver.name(),
                        expires_on = ?token.expires_on(),
                        "credential returned an expired token"
                    );
                    failures.push(format!("{}: token already expired", resolver.name()));
                }
                Ok(token) => {
                    info!(
                        credential = resolver.name(),
                        expires_on = ?token.expires_on(),
                        "resolved management API credential"
                    );
                    return Ok(token);
                }
                Err(error) => {
                    debug!(credential = resolver.name(), error = %error, "credential unavailable");
                    failures.push(format!("{}: {error}", resolver.name()));
                }
            }
        }

        if failures.is_empty() {
            return Err(AppError::Authentication(
                "no credential resolvers configured".to_owned(),
            ));
        }

        Err(AppError::Authentication(format!(
            "no credential could be resolved ({})",
            failures.join("; ")
        )))
    }
}
