use serde::{Deserialize, Serialize};

use crate::services::OAuthTokens;

/// Raw search body. Every field is optional here so that missing or `null`
/// values surface as the gateway's validation error rather than a serde one.
#[derive(Debug, Default, Deserialize)]
pub struct CompetitorSearchBody {
    pub niche: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub hashtags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthRequest {
    pub action: Option<String>,
    pub code: Option<String>,
    pub refresh_token: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<OAuthTokens>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OAuthResponse {
    pub const fn auth_url(url: String) -> Self {
        Self {
            success: true,
            auth_url: Some(url),
            tokens: None,
            error: None,
        }
    }

    pub const fn tokens(tokens: OAuthTokens) -> Self {
        Self {
            success: true,
            auth_url: None,
            tokens: Some(tokens),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            auth_url: None,
            tokens: None,
            error: Some(message.into()),
        }
    }
}
