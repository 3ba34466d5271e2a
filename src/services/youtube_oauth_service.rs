//! YouTube account linking via Google's OAuth2 endpoints.
//!
//! The scraping pipeline does not depend on this; it only brokers the
//! consent URL and the token exchanges for the frontend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("YouTube OAuth client is not configured")]
    NotConfigured,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Token endpoint error: {0}")]
    Upstream(String),
}

/// Token payload as returned by Google, passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

#[async_trait::async_trait]
pub trait YouTubeOAuthService: Send + Sync {
    /// Consent screen URL requesting offline access.
    fn authorization_url(&self, state: Option<&str>) -> Result<String, OAuthError>;

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, OAuthError>;

    async fn refresh(&self, refresh_token: &str) -> Result<OAuthTokens, OAuthError>;
}
