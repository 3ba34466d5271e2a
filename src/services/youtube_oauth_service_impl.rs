//! `reqwest` implementation of the `YouTubeOAuthService` trait.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::config::YouTubeOAuthConfig;
use crate::services::youtube_oauth_service::{OAuthError, OAuthTokens, YouTubeOAuthService};

#[derive(Deserialize)]
struct TokenErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

pub struct GoogleOAuthService {
    client: Client,
    config: YouTubeOAuthConfig,
}

impl GoogleOAuthService {
    #[must_use]
    pub const fn new(client: Client, config: YouTubeOAuthConfig) -> Self {
        Self { client, config }
    }

    fn ensure_configured(&self) -> Result<(), OAuthError> {
        if !self.config.is_configured() {
            return Err(OAuthError::NotConfigured);
        }
        Ok(())
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<OAuthTokens, OAuthError> {
        self.ensure_configured()?;

        let response = self
            .client
            .post(&self.config.token_endpoint)
            .form(params)
            .send()
            .await
            .map_err(|e| OAuthError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<TokenErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error_description.or(body.error))
                .unwrap_or_else(|| status.to_string());
            warn!(%status, %detail, "Token endpoint rejected request");
            return Err(OAuthError::Upstream(detail));
        }

        response
            .json::<OAuthTokens>()
            .await
            .map_err(|e| OAuthError::Upstream(format!("Invalid token response: {e}")))
    }
}

#[async_trait]
impl YouTubeOAuthService for GoogleOAuthService {
    fn authorization_url(&self, state: Option<&str>) -> Result<String, OAuthError> {
        self.ensure_configured()?;

        let scope = self.config.scopes.join(" ");
        let mut url = Url::parse(&self.config.auth_endpoint)
            .map_err(|e| OAuthError::InvalidRequest(format!("Invalid auth endpoint: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri)
                .append_pair("response_type", "code")
                .append_pair("scope", &scope)
                .append_pair("access_type", "offline")
                .append_pair("prompt", "consent");
            if let Some(state) = state {
                query.append_pair("state", state);
            }
        }
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, OAuthError> {
        if code.is_empty() {
            return Err(OAuthError::InvalidRequest(
                "Authorization code is required".to_string(),
            ));
        }

        let tokens = self
            .token_request(&[
                ("code", code),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("redirect_uri", &self.config.redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .await?;
        info!("Exchanged YouTube authorization code");
        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<OAuthTokens, OAuthError> {
        if refresh_token.is_empty() {
            return Err(OAuthError::InvalidRequest(
                "Refresh token is required".to_string(),
            ));
        }

        let tokens = self
            .token_request(&[
                ("refresh_token", refresh_token),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("grant_type", "refresh_token"),
            ])
            .await?;
        info!("Refreshed YouTube access token");
        Ok(tokens)
    }
}
