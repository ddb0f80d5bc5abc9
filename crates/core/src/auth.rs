use std::fmt::{Debug, Formatter};

/// Bearer token for the management API, resolved once per run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_on: Option<i64>,
}

impl AccessToken {
    /// Creates an access token from the raw bearer secret and optional expiry
    /// (unix seconds).
    #[must_use]
    pub fn new(secret: impl Into<String>, expires_on: Option<i64>) -> Self {
        Self {
            secret: secret.into(),
            expires_on,
        }
    }

    /// Returns the raw bearer secret.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }

    /// Returns the expiry as unix seconds when the issuer reported one.
    #[must_use]
    pub fn expires_on(&self) -> Option<i64> {
        self.expires_on
    }

    /// Returns whether the token is expired at the given unix time.
    #[must_use]
    pub fn is_expired_at(&self, unix_seconds: i64) -> bool {
        self.expires_on.is_some_and(|expires_on| expires_on <= unix_seconds)
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.secret)
    }
}

impl Debug for AccessToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}
