use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, AppState, CompetitorSearchBody, validation};

pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// `POST /api/competitors/search`
///
/// Scrapes the requested platforms for profiles matching the niche (or the
/// first hashtag) and returns `{results, insights, errors}`. Identical
/// requests within the cache TTL are answered from the response cache; the
/// `x-cache` header says which.
pub async fn search_competitors(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CompetitorSearchBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = validation::search_request(body)?;
    let outcome = state.competitor_search().search(request).await?;

    let cache_status = HeaderValue::from_static(if outcome.cache_hit { "HIT" } else { "MISS" });
    let mut response = Json(outcome.response.as_ref()).into_response();
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, cache_status);
    Ok(response)
}
