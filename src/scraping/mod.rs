//! Per-platform competitor scrapers.
//!
//! Each scraper owns one browser session for the duration of a scrape, turns
//! the rendered pages into [`ProfileCandidate`]s, and attaches synthetic
//! audience metrics. Failures are reported per platform and never affect
//! sibling platforms.

pub mod browser;
pub mod chromium;
pub mod cookies;
pub mod extract;
pub mod instagram;
pub mod synthetic;
pub mod tiktok;
pub mod wait;
pub mod youtube;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub use browser::{BrowserError, BrowserLauncher, BrowserSession, LaunchOptions};
pub use chromium::ChromiumLauncher;
pub use instagram::InstagramScraper;
pub use tiktok::TikTokScraper;
pub use wait::{WaitPolicy, wait_for_any};
pub use youtube::YouTubeScraper;

use crate::config::ScraperConfig;
use crate::models::platform::Platform;
use crate::models::profile::{InfluencerProfile, ProfileCandidate, dedup_by_username};
use crate::models::search::PlatformResult;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("No tag or niche specified")]
    MissingSearchTerm,

    #[error("{} scraping failed: {message}", .platform.display_name())]
    Failed { platform: Platform, message: String },

    #[error("{} scraping timed out after {:?}", .platform.display_name(), .timeout)]
    TimedOut {
        platform: Platform,
        timeout: std::time::Duration,
    },
}

impl ScrapeError {
    pub fn failed(platform: Platform, err: impl std::fmt::Display) -> Self {
        Self::Failed {
            platform,
            message: err.to_string(),
        }
    }
}

#[async_trait]
pub trait PlatformScraper: Send + Sync {
    fn platform(&self) -> Platform;

    async fn scrape(&self, niche: &str, hashtags: &[String])
    -> Result<PlatformResult, ScrapeError>;
}

/// First usable hashtag (leading `#` removed), else the niche.
#[must_use]
pub fn search_term(niche: &str, hashtags: &[String]) -> Option<String> {
    hashtags
        .first()
        .map(|tag| tag.trim().trim_start_matches('#').trim())
        .filter(|tag| !tag.is_empty())
        .or_else(|| Some(niche.trim()).filter(|n| !n.is_empty()))
        .map(ToString::to_string)
}

/// What every scraper needs: a way to start sessions plus tuning knobs.
#[derive(Clone)]
pub struct ScrapeContext {
    launcher: Arc<dyn BrowserLauncher>,
    config: Arc<ScraperConfig>,
}

impl ScrapeContext {
    #[must_use]
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: ScraperConfig) -> Self {
        Self {
            launcher,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    #[must_use]
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::from_config(&self.config)
    }

    pub async fn open_session(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        let options = LaunchOptions::with_random_user_agent(&self.config.user_agents);
        self.launcher.launch(options).await
    }

    /// Closes `session`; a failed close is logged, never propagated.
    pub async fn release(&self, platform: Platform, mut session: Box<dyn BrowserSession>) {
        if let Err(e) = session.close().await {
            warn!(%platform, error = %e, "Failed to close browser session");
        }
    }

    /// Dedups by username, caps the list, and attaches synthetic metrics.
    #[must_use]
    pub fn finish(&self, platform: Platform, candidates: Vec<ProfileCandidate>) -> PlatformResult {
        let mut unique = dedup_by_username(candidates);
        unique.truncate(self.config.max_profiles);

        let mut rng = rand::rng();
        let influencers: Vec<InfluencerProfile> = unique
            .into_iter()
            .map(|c| InfluencerProfile::from_candidate(c, synthetic::synthesize_metrics(&mut rng)))
            .collect();

        debug!(%platform, count = influencers.len(), "Scrape produced influencers");
        metrics::counter!("scrape_profiles_total", "platform" => platform.id())
            .increment(influencers.len() as u64);

        PlatformResult::new(platform, influencers)
    }
}

/// Waits for the first selector that renders; a timeout is only logged.
pub(crate) async fn await_render(
    ctx: &ScrapeContext,
    platform: Platform,
    session: &mut dyn BrowserSession,
    selectors: &[&str],
) -> Result<(), BrowserError> {
    match wait_for_any(session, selectors, &ctx.wait_policy()).await? {
        Some(selector) => debug!(%platform, %selector, "Content rendered"),
        None => debug!(%platform, "Render wait timed out, extracting what is present"),
    }
    Ok(())
}
