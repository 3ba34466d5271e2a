use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{AppState, OAuthRequest, OAuthResponse};
use crate::services::OAuthError;

fn failure(err: &OAuthError) -> Response {
    let status = match err {
        OAuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        OAuthError::Upstream(_) => StatusCode::BAD_GATEWAY,
        OAuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::warn!(error = %err, "YouTube OAuth request failed");
    }
    (status, Json(OAuthResponse::error(err.to_string()))).into_response()
}

/// `POST /youtube-oauth`
///
/// `initiate` returns the consent URL; `callback` trades `code` for tokens;
/// `refresh` trades `refreshToken` for a new access token.
pub async fn youtube_oauth(
    State(state): State<Arc<AppState>>,
    body: Result<Json<OAuthRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return failure(&OAuthError::InvalidRequest("Invalid request body".to_string()));
    };
    let oauth = state.youtube_oauth();

    let outcome = match body.action.as_deref() {
        Some("initiate") => oauth
            .authorization_url(body.state.as_deref())
            .map(OAuthResponse::auth_url),
        Some("callback") => match body.code.as_deref() {
            Some(code) => oauth.exchange_code(code).await.map(OAuthResponse::tokens),
            None => Err(OAuthError::InvalidRequest(
                "Authorization code is required".to_string(),
            )),
        },
        Some("refresh") => match body.refresh_token.as_deref() {
            Some(token) => oauth.refresh(token).await.map(OAuthResponse::tokens),
            None => Err(OAuthError::InvalidRequest(
                "Refresh token is required".to_string(),
            )),
        },
        Some(other) => Err(OAuthError::InvalidRequest(format!("Invalid action: {other}"))),
        None => Err(OAuthError::InvalidRequest("Action is required".to_string())),
    };

    match outcome {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => failure(&e),
    }
}
