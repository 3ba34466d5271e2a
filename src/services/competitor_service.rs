//! Competitor search: validation, response caching and aggregation.

use std::sync::Arc;
use thiserror::Error;

use crate::models::search::{AggregateResponse, SearchRequest};

pub const REQUIRED_FIELDS_MESSAGE: &str = "niche and platforms are required";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{REQUIRED_FIELDS_MESSAGE}")]
    Validation,

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub response: Arc<AggregateResponse>,
    pub cache_hit: bool,
}

#[async_trait::async_trait]
pub trait CompetitorSearchService: Send + Sync {
    /// Returns the cached response for an identical request, otherwise
    /// scrapes every requested platform and caches the result.
    async fn search(&self, request: SearchRequest) -> Result<SearchOutcome, SearchError>;
}

/// `niche` must be non-empty and at least one platform must be named.
pub fn validate(request: &SearchRequest) -> Result<(), SearchError> {
    if request.niche.is_empty() || request.platforms.is_empty() {
        return Err(SearchError::Validation);
    }
    Ok(())
}
