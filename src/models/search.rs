use serde::{Deserialize, Serialize};

use super::platform::Platform;
use super::profile::InfluencerProfile;

/// A validated competitor search.
///
/// `platforms` is kept exactly as the caller sent it (order, duplicates and
/// unknown identifiers included) because it feeds the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub niche: String,
    pub platforms: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl SearchRequest {
    /// Known platforms named by the request, deduplicated, in report order.
    #[must_use]
    pub fn requested_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.platforms.iter().any(|id| id == p.id()))
            .collect()
    }

    /// Identifiers that matched no platform.
    #[must_use]
    pub fn unknown_platforms(&self) -> Vec<&str> {
        self.platforms
            .iter()
            .map(String::as_str)
            .filter(|id| Platform::from_id(id).is_none())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformResult {
    pub platform: Platform,
    pub influencers: Vec<InfluencerProfile>,
    /// Placeholder kept for response compatibility; always empty.
    pub insights: Vec<String>,
}

impl PlatformResult {
    #[must_use]
    pub const fn new(platform: Platform, influencers: Vec<InfluencerProfile>) -> Self {
        Self {
            platform,
            influencers,
            insights: Vec::new(),
        }
    }

    #[must_use]
    pub fn average_engagement_rate(&self) -> Option<f64> {
        if self.influencers.is_empty() {
            return None;
        }
        let total: f64 = self.influencers.iter().map(|i| i.engagement_rate).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(total / self.influencers.len() as f64)
    }

    /// `Average engagement rate (<platform>): <x.xx>%`, or `None` when no
    /// influencers were found.
    #[must_use]
    pub fn engagement_insight(&self) -> Option<String> {
        self.average_engagement_rate().map(|avg| {
            format!(
                "Average engagement rate ({}): {avg:.2}%",
                self.platform.id()
            )
        })
    }
}

/// The unit returned to callers and stored in the response cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AggregateResponse {
    pub results: Vec<PlatformResult>,
    pub insights: Vec<String>,
    pub errors: Vec<String>,
}
