pub mod aggregator;
pub use aggregator::Aggregator;

pub mod response_cache;
pub use response_cache::{CacheKey, Lookup, MemoryResponseCache, ResponseCache};

pub mod competitor_service;
pub mod competitor_service_impl;
pub use competitor_service::{CompetitorSearchService, SearchError, SearchOutcome};
pub use competitor_service_impl::DefaultCompetitorSearchService;

pub mod youtube_oauth_service;
pub mod youtube_oauth_service_impl;
pub use youtube_oauth_service::{OAuthError, OAuthTokens, YouTubeOAuthService};
pub use youtube_oauth_service_impl::GoogleOAuthService;
