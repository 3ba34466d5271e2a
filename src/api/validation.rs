use axum::{Json, extract::rejection::JsonRejection};

use super::{ApiError, CompetitorSearchBody};
use crate::models::search::SearchRequest;
use crate::services::competitor_service::REQUIRED_FIELDS_MESSAGE;

/// Malformed JSON, a missing `niche`, or a missing `platforms` array all
/// produce the same 400 as an empty one.
pub fn search_request(
    body: Result<Json<CompetitorSearchBody>, JsonRejection>,
) -> Result<SearchRequest, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Unreadable search body");
        ApiError::validation(REQUIRED_FIELDS_MESSAGE)
    })?;

    match (body.niche, body.platforms) {
        (Some(niche), Some(platforms)) if !niche.is_empty() && !platforms.is_empty() => {
            Ok(SearchRequest {
                niche,
                platforms,
                hashtags: body.hashtags.unwrap_or_default(),
            })
        }
        _ => Err(ApiError::validation(REQUIRED_FIELDS_MESSAGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(niche: Option<&str>, platforms: Option<&[&str]>) -> CompetitorSearchBody {
        CompetitorSearchBody {
            niche: niche.map(ToString::to_string),
            platforms: platforms.map(|p| p.iter().map(ToString::to_string).collect()),
            hashtags: None,
        }
    }

    #[test]
    fn accepts_minimal_body() {
        let request = search_request(Ok(Json(body(Some("fitness"), Some(&["youtube"]))))).unwrap();
        assert_eq!(request.niche, "fitness");
        assert!(request.hashtags.is_empty());
    }

    #[test]
    fn rejects_missing_or_empty_fields() {
        for candidate in [
            body(None, Some(&["youtube"])),
            body(Some(""), Some(&["youtube"])),
            body(Some("fitness"), None),
            body(Some("fitness"), Some(&[])),
        ] {
            let err = search_request(Ok(Json(candidate))).unwrap_err();
            assert_eq!(err.to_string(), "niche and platforms are required");
        }
    }
}
