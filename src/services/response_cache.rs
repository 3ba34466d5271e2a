//! Response cache for competitor searches.
//!
//! Entries live for the configured TTL and are only ever replaced wholesale.
//! [`ResponseCache::get_or_try_insert_with`] is the single-flight entry point:
//! concurrent misses on one key share a single computation, and a failed
//! computation leaves nothing behind.

use async_trait::async_trait;
use futures::future::BoxFuture;
use moka::future::Cache;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::models::search::{AggregateResponse, SearchRequest};
use crate::services::competitor_service::SearchError;

/// Serialized `{niche, platforms, hashtags}` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

#[derive(Serialize)]
struct KeyFields<'a> {
    niche: &'a str,
    platforms: Cow<'a, [String]>,
    hashtags: &'a [String],
}

impl CacheKey {
    /// Field order is fixed. `platforms` keeps the caller's order unless
    /// `canonicalize` is set, in which case it is sorted and deduplicated.
    pub fn for_request(request: &SearchRequest, canonicalize: bool) -> serde_json::Result<Self> {
        let platforms = if canonicalize {
            let mut sorted = request.platforms.clone();
            sorted.sort();
            sorted.dedup();
            Cow::Owned(sorted)
        } else {
            Cow::Borrowed(request.platforms.as_slice())
        };

        let fields = KeyFields {
            niche: &request.niche,
            platforms,
            hashtags: &request.hashtags,
        };
        serde_json::to_string(&fields).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a single-flight lookup.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub value: Arc<AggregateResponse>,
    /// `false` when this call (or one it joined) had to compute the value.
    pub hit: bool,
}

pub type ComputeFuture<'a> = BoxFuture<'a, Result<Arc<AggregateResponse>, SearchError>>;

#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<Arc<AggregateResponse>>;

    /// Overwrites any existing entry for `key`.
    async fn insert(&self, key: CacheKey, value: Arc<AggregateResponse>);

    /// Returns the cached value, or runs `init` once for all concurrent
    /// callers of the same key and stores its `Ok` output.
    async fn get_or_try_insert_with<'a>(
        &self,
        key: CacheKey,
        init: ComputeFuture<'a>,
    ) -> Result<Lookup, Arc<SearchError>>;

    async fn entry_count(&self) -> u64;
}

pub struct MemoryResponseCache {
    inner: Cache<CacheKey, Arc<AggregateResponse>>,
}

impl MemoryResponseCache {
    #[must_use]
    pub fn new(ttl: Duration, max_entries: Option<u64>) -> Self {
        let mut builder = Cache::builder().time_to_live(ttl);
        if let Some(max) = max_entries {
            builder = builder.max_capacity(max);
        }
        Self {
            inner: builder.build(),
        }
    }

    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl(), config.max_entries)
    }
}

#[async_trait]
impl ResponseCache for MemoryResponseCache {
    async fn get(&self, key: &CacheKey) -> Option<Arc<AggregateResponse>> {
        self.inner.get(key).await
    }

    async fn insert(&self, key: CacheKey, value: Arc<AggregateResponse>) {
        self.inner.insert(key, value).await;
    }

    async fn get_or_try_insert_with<'a>(
        &self,
        key: CacheKey,
        init: ComputeFuture<'a>,
    ) -> Result<Lookup, Arc<SearchError>> {
        let entry = self.inner.entry(key).or_try_insert_with(init).await?;
        let hit = !entry.is_fresh();
        Ok(Lookup {
            value: entry.into_value(),
            hit,
        })
    }

    async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(platforms: &[&str]) -> SearchRequest {
        SearchRequest {
            niche: "fitness".to_string(),
            platforms: platforms.iter().map(ToString::to_string).collect(),
            hashtags: vec!["#gym".to_string()],
        }
    }

    fn response(errors: &[&str]) -> Arc<AggregateResponse> {
        Arc::new(AggregateResponse {
            errors: errors.iter().map(ToString::to_string).collect(),
            ..AggregateResponse::default()
        })
    }

    #[test]
    fn key_serializes_fields_in_order() {
        let key = CacheKey::for_request(&request(&["youtube"]), false).unwrap();
        assert_eq!(
            key.as_str(),
            r##"{"niche":"fitness","platforms":["youtube"],"hashtags":["#gym"]}"##
        );
    }

    #[test]
    fn key_is_sensitive_to_platform_order() {
        let a = CacheKey::for_request(&request(&["instagram", "tiktok"]), false).unwrap();
        let b = CacheKey::for_request(&request(&["tiktok", "instagram"]), false).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn canonical_key_ignores_order_and_duplicates() {
        let a = CacheKey::for_request(&request(&["instagram", "tiktok"]), true).unwrap();
        let b = CacheKey::for_request(&request(&["tiktok", "instagram", "tiktok"]), true).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn insert_overwrites() {
        let cache = MemoryResponseCache::new(Duration::from_secs(60), None);
        let key = CacheKey::for_request(&request(&["youtube"]), false).unwrap();

        cache.insert(key.clone(), response(&["first"])).await;
        cache.insert(key.clone(), response(&["second"])).await;

        assert_eq!(cache.get(&key).await.unwrap().errors, vec!["second"]);
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = MemoryResponseCache::new(Duration::from_millis(50), None);
        let key = CacheKey::for_request(&request(&["youtube"]), false).unwrap();

        cache.insert(key.clone(), response(&[])).await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_computation() {
        let cache = Arc::new(MemoryResponseCache::new(Duration::from_secs(60), None));
        let key = CacheKey::for_request(&request(&["youtube"]), false).unwrap();
        let runs = Arc::new(AtomicUsize::new(0));

        let lookups = (0..4).map(|_| {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            let runs = Arc::clone(&runs);
            tokio::spawn(async move {
                cache
                    .get_or_try_insert_with(
                        key,
                        Box::pin(async move {
                            runs.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok::<_, SearchError>(response(&["computed"]))
                        }),
                    )
                    .await
            })
        });

        let results = futures::future::join_all(lookups).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        let misses = results
            .into_iter()
            .map(|r| r.unwrap().unwrap())
            .filter(|lookup| !lookup.hit)
            .count();
        assert_eq!(misses, 1);
    }

    #[tokio::test]
    async fn failed_computation_is_not_cached() {
        let cache = MemoryResponseCache::new(Duration::from_secs(60), None);
        let key = CacheKey::for_request(&request(&["youtube"]), false).unwrap();

        let failed = cache
            .get_or_try_insert_with(
                key.clone(),
                Box::pin(async {
                    Err::<Arc<AggregateResponse>, _>(SearchError::Internal("boom".to_string()))
                }),
            )
            .await;
        assert!(failed.is_err());
        assert!(cache.get(&key).await.is_none());

        let lookup = cache
            .get_or_try_insert_with(
                key.clone(),
                Box::pin(async { Ok::<_, SearchError>(response(&[])) }),
            )
            .await
            .unwrap();
        assert!(!lookup.hit);

        let again = cache
            .get_or_try_insert_with(
                key,
                Box::pin(async { Ok::<_, SearchError>(response(&["unused"])) }),
            )
            .await
            .unwrap();
        assert!(again.hit);
        assert!(again.value.errors.is_empty());
    }
}
