use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::CacheConfig;
use crate::models::search::SearchRequest;
use crate::services::aggregator::Aggregator;
use crate::services::competitor_service::{
    CompetitorSearchService, SearchError, SearchOutcome, validate,
};
use crate::services::response_cache::{CacheKey, ResponseCache};

pub struct DefaultCompetitorSearchService {
    aggregator: Arc<Aggregator>,
    cache: Arc<dyn ResponseCache>,
    canonicalize_keys: bool,
    coalesce_requests: bool,
}

impl DefaultCompetitorSearchService {
    #[must_use]
    pub fn new(
        aggregator: Arc<Aggregator>,
        cache: Arc<dyn ResponseCache>,
        cache_config: &CacheConfig,
    ) -> Self {
        Self {
            aggregator,
            cache,
            canonicalize_keys: cache_config.canonicalize_keys,
            coalesce_requests: cache_config.coalesce_requests,
        }
    }

    async fn coalesced(
        &self,
        key: CacheKey,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, SearchError> {
        let aggregator = &self.aggregator;
        let lookup = self
            .cache
            .get_or_try_insert_with(
                key,
                Box::pin(async move {
                    Ok::<_, SearchError>(Arc::new(aggregator.aggregate(request).await))
                }),
            )
            .await
            .map_err(|shared| {
                Arc::try_unwrap(shared).unwrap_or_else(|e| SearchError::Internal(e.to_string()))
            })?;

        Ok(SearchOutcome {
            response: lookup.value,
            cache_hit: lookup.hit,
        })
    }

    async fn read_through(&self, key: CacheKey, request: &SearchRequest) -> SearchOutcome {
        if let Some(response) = self.cache.get(&key).await {
            return SearchOutcome {
                response,
                cache_hit: true,
            };
        }

        let response = Arc::new(self.aggregator.aggregate(request).await);
        self.cache.insert(key, Arc::clone(&response)).await;
        SearchOutcome {
            response,
            cache_hit: false,
        }
    }
}

#[async_trait]
impl CompetitorSearchService for DefaultCompetitorSearchService {
    async fn search(&self, request: SearchRequest) -> Result<SearchOutcome, SearchError> {
        validate(&request)?;

        let unknown = request.unknown_platforms();
        if !unknown.is_empty() {
            warn!(?unknown, "Ignoring unknown platforms");
        }

        let key = CacheKey::for_request(&request, self.canonicalize_keys)
            .map_err(|e| SearchError::Internal(format!("Failed to derive cache key: {e}")))?;

        let outcome = if self.coalesce_requests {
            self.coalesced(key, &request).await?
        } else {
            self.read_through(key, &request).await
        };

        let result = if outcome.cache_hit { "hit" } else { "miss" };
        metrics::counter!("competitor_search_cache_total", "result" => result).increment(1);
        info!(
            niche = %request.niche,
            platforms = ?request.platforms,
            cache = result,
            "Competitor search served"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::platform::Platform;
    use crate::models::search::PlatformResult;
    use crate::scraping::{PlatformScraper, ScrapeError};
    use crate::services::response_cache::MemoryResponseCache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingScraper {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlatformScraper for CountingScraper {
        fn platform(&self) -> Platform {
            Platform::YouTube
        }

        async fn scrape(
            &self,
            _niche: &str,
            _hashtags: &[String],
        ) -> Result<PlatformResult, ScrapeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(PlatformResult::new(Platform::YouTube, vec![]))
        }
    }

    fn service(
        scraper: Arc<CountingScraper>,
        cache_config: CacheConfig,
    ) -> DefaultCompetitorSearchService {
        let scrapers: [Arc<dyn PlatformScraper>; 1] = [scraper];
        let aggregator = Aggregator::new(scrapers, true, Duration::from_secs(5));
        DefaultCompetitorSearchService::new(
            Arc::new(aggregator),
            Arc::new(MemoryResponseCache::from_config(&cache_config)),
            &cache_config,
        )
    }

    fn request(platforms: &[&str]) -> SearchRequest {
        SearchRequest {
            niche: "fitness".to_string(),
            platforms: platforms.iter().map(ToString::to_string).collect(),
            hashtags: vec![],
        }
    }

    #[tokio::test]
    async fn second_identical_search_is_a_hit() {
        for coalesce_requests in [true, false] {
            let scraper = Arc::new(CountingScraper::default());
            let svc = service(
                scraper.clone(),
                CacheConfig {
                    coalesce_requests,
                    ..CacheConfig::default()
                },
            );

            let first = svc.search(request(&["youtube"])).await.unwrap();
            let second = svc.search(request(&["youtube"])).await.unwrap();

            assert!(!first.cache_hit);
            assert!(second.cache_hit);
            assert!(Arc::ptr_eq(&first.response, &second.response));
            assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn concurrent_identical_searches_scrape_once() {
        let scraper = Arc::new(CountingScraper::default());
        let svc = service(scraper.clone(), CacheConfig::default());

        let (a, b) = tokio::join!(
            svc.search(request(&["youtube"])),
            svc.search(request(&["youtube"]))
        );

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reordered_platforms_miss_unless_canonicalized() {
        let scraper = Arc::new(CountingScraper::default());
        let svc = service(scraper.clone(), CacheConfig::default());
        svc.search(request(&["youtube", "tiktok"])).await.unwrap();
        let reordered = svc.search(request(&["tiktok", "youtube"])).await.unwrap();
        assert!(!reordered.cache_hit);
        assert_eq!(scraper.calls.load(Ordering::SeqCst), 2);

        let scraper = Arc::new(CountingScraper::default());
        let svc = service(
            scraper.clone(),
            CacheConfig {
                canonicalize_keys: true,
                ..CacheConfig::default()
            },
        );
        svc.search(request(&["youtube", "tiktok"])).await.unwrap();
        let reordered = svc.search(request(&["tiktok", "youtube"])).await.unwrap();
        assert!(reordered.cache_hit);
        assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_request_never_scrapes() {
        let scraper = Arc::new(CountingScraper::default());
        let svc = service(scraper.clone(), CacheConfig::default());

        let err = svc.search(request(&[])).await.unwrap_err();
        assert!(matches!(err, SearchError::Validation));
        assert_eq!(scraper.calls.load(Ordering::SeqCst), 0);
    }
}
