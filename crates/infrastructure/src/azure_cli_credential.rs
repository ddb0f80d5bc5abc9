use async_trait::async_trait;
use sentinel_detect_application::CredentialResolver;
use sentinel_detect_core::{AccessToken, AppError, AppResult};
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

/// Resolves tokens from the signed-in Azure CLI session.
#[derive(Debug, Clone)]
pub struct AzureCliCredential {
    program: String,
    resource: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenPayload {
    access_token: String,
    #[serde(rename = "expires_on")]
    expires_on: Option<i64>,
}

impl AzureCliCredential {
    /// Creates a CLI credential for the given management resource, e.g.
    /// `https://management.azure.com/`.
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        let program = if cfg!(windows) { "az.cmd" } else { "az" };
        Self {
            program: program.to_owned(),
            resource: resource.into(),
        }
    }
}

#[async_trait]
impl CredentialResolver for AzureCliCredential {
    fn name(&self) -> &'static str {
        "azure-cli"
    }

    async fn resolve(&self) -> AppResult<AccessToken> {
        debug!(resource = %self.resource, "requesting token from Azure CLI");
        let output = Command::new(self.program.as_str())
            .args([
                "account",
                "get-access-token",
                "--resource",
                self.resource.as_str(),
                "--output",
                "json",
            ])
            .output()
            .await
            .map_err(|error| {
                AppError::Authentication(format!("failed to run Azure CLI: {error}"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Authentication(format!(
                "Azure CLI could not issue a token ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_cli_token(&output.stdout)
    }
}

fn parse_cli_token(stdout: &[u8]) -> AppResult<AccessToken> {
    let payload = serde_json::from_slice::<CliTokenPayload>(stdout).map_err(|error| {
        AppError::Authentication(format!("failed to parse Azure CLI token output: {error}"))
    })?;

    if payload.access_token.trim().is_empty() {
        return Err(AppError::Authentication(
            "Azure CLI returned an empty access token".to_owned(),
        ));
    }

    Ok(AccessToken::new(payload.access_token, payload.expires_on))
}
