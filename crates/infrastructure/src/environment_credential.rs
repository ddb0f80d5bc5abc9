use std::env;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header;
use sentinel_detect_application::CredentialResolver;
use sentinel_detect_core::{AccessToken, AppError, AppResult};
use serde::Deserialize;
use tracing::debug;
use url::Url;
use url::form_urlencoded;

/// Client-secret settings for a service principal.
#[derive(Clone)]
pub struct ClientSecretSettings {
    /// Entra ID tenant.
    pub tenant_id: String,
    /// Application (client) id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
}

/// Resolves tokens from environment configuration: a pre-issued
/// `AZURE_ACCESS_TOKEN`, or a service principal through
/// `AZURE_TENANT_ID`, `AZURE_CLIENT_ID` and `AZURE_CLIENT_SECRET`.
pub struct EnvironmentCredential {
    http_client: reqwest::Client,
    authority_host: Url,
    scope: String,
    static_token: Option<String>,
    client_secret: Option<ClientSecretSettings>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

impl EnvironmentCredential {
    /// Creates a credential from explicit settings.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        authority_host: Url,
        scope: impl Into<String>,
        static_token: Option<String>,
        client_secret: Option<ClientSecretSettings>,
    ) -> Self {
        Self {
            http_client,
            authority_host,
            scope: scope.into(),
            static_token,
            client_secret,
        }
    }

    /// Creates a credential from the process environment.
    #[must_use]
    pub fn from_env(
        http_client: reqwest::Client,
        authority_host: Url,
        scope: impl Into<String>,
    ) -> Self {
        let client_secret = match (
            optional_env("AZURE_TENANT_ID"),
            optional_env("AZURE_CLIENT_ID"),
            optional_env("AZURE_CLIENT_SECRET"),
        ) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Some(ClientSecretSettings {
                tenant_id,
                client_id,
                client_secret,
            }),
            _ => None,
        };

        Self::new(
            http_client,
            authority_host,
            scope,
            optional_env("AZURE_ACCESS_TOKEN"),
            client_secret,
        )
    }

    fn token_url(&self, tenant_id: &str) -> AppResult<Url> {
        let mut url = self.authority_host.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "authority host '{}' cannot be used as a base URL",
                    self.authority_host
                ))
            })?
            .pop_if_empty()
            .extend([tenant_id, "oauth2", "v2.0", "token"]);

        Ok(url)
    }

    async fn request_client_secret_token(
        &self,
        settings: &ClientSecretSettings,
    ) -> AppResult<AccessToken> {
        let endpoint = self.token_url(settings.tenant_id.as_str())?;
        debug!(
            tenant_id = %settings.tenant_id,
            client_id = %settings.client_id,
            "requesting client credentials token"
        );

        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .append_pair("client_id", settings.client_id.as_str())
            .append_pair("client_secret", settings.client_secret.as_str())
            .append_pair("scope", self.scope.as_str())
            .finish();

        let response = self
            .http_client
            .post(endpoint)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|error| {
                AppError::Authentication(format!("failed to call token endpoint: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(AppError::Authentication(format!(
                "token endpoint returned status {}: {body}",
                status.as_u16()
            )));
        }

        let token = response.json::<TokenResponse>().await.map_err(|error| {
            AppError::Authentication(format!("failed to parse token endpoint response: {error}"))
        })?;
        let expires_on = token
            .expires_in
            .map(|seconds| Utc::now().timestamp().saturating_add(seconds));

        Ok(AccessToken::new(token.access_token, expires_on))
    }
}

#[async_trait]
impl CredentialResolver for EnvironmentCredential {
    fn name(&self) -> &'static str {
        "environment"
    }

    async fn resolve(&self) -> AppResult<AccessToken> {
        if let Some(token) = self.static_token.as_deref() {
            return Ok(AccessToken::new(token, None));
        }

        match self.client_secret.as_ref() {
            Some(settings) => self.request_client_secret_token(settings).await,
            None => Err(AppError::Authentication(
                "set AZURE_ACCESS_TOKEN, or AZURE_TENANT_ID with AZURE_CLIENT_ID and \
                 AZURE_CLIENT_SECRET"
                    .to_owned(),
            )),
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use sentinel_detect_application::CredentialResolver;
    use sentinel_detect_core::AppError;
    use url::Url;

    use super::{ClientSecretSettings, EnvironmentCredential};

    fn credential(
        static_token: Option<&str>,
        client_secret: Option<ClientSecretSettings>,
    ) -> EnvironmentCredential {
        EnvironmentCredential::new(
            reqwest::Client::new(),
            Url::parse("https://login.microsoftonline.com").unwrap_or_else(|_| unreachable!()),
            "https://management.azure.com/.default",
            static_token.map(str::to_owned),
            client_secret,
        )
    }

    #[tokio::test]
    async fn static_token_is_returned_without_network() {
        let token = credential(Some("pre-issued"), None)
            .resolve()
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(token.secret(), "pre-issued");
    }

    #[tokio::test]
    async fn missing_configuration_is_an_authentication_error() {
        let result = credential(None, None).resolve().await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
    }

    #[test]
    fn token_url_targets_tenant_v2_endpoint() {
        let url = credential(None, None)
            .token_url("contoso.onmicrosoft.com")
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            url.as_str(),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );
    }
}
