use serde::{Deserialize, Serialize};

/// Where a profile's audience figures came from.
///
/// Anonymous scraping exposes neither follower counts nor engagement, so every
/// figure produced today is `Synthetic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricsSource {
    #[default]
    Synthetic,
    Observed,
}

/// Audience figures attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudienceMetrics {
    pub followers: u64,
    pub engagement_rate: f64,
    pub source: MetricsSource,
}

/// Profile data lifted from a page before metrics are attached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileCandidate {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerProfile {
    pub username: Option<String>,
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub profile_url: Option<String>,
    pub followers: u64,
    pub engagement_rate: f64,
    pub metrics_source: MetricsSource,
    /// Reserved for post-level data; never populated by the scrapers.
    pub recent_posts: Vec<serde_json::Value>,
}

impl InfluencerProfile {
    #[must_use]
    pub fn from_candidate(candidate: ProfileCandidate, metrics: AudienceMetrics) -> Self {
        Self {
            username: candidate.username,
            avatar: candidate.avatar,
            bio: candidate.bio,
            profile_url: candidate.profile_url,
            followers: metrics.followers,
            engagement_rate: metrics.engagement_rate,
            metrics_source: metrics.source,
            recent_posts: Vec::new(),
        }
    }
}

/// Keeps the first candidate seen for each username, preserving order.
///
/// Candidates without a username are kept as-is; they cannot collide.
#[must_use]
pub fn dedup_by_username(candidates: Vec<ProfileCandidate>) -> Vec<ProfileCandidate> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|c| match &c.username {
            Some(name) => seen.insert(name.clone()),
            None => true,
        })
        .collect()
}
