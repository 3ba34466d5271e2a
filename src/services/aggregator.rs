//! Fans a search out to the requested platform scrapers and folds the
//! outcomes into one [`AggregateResponse`].

use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::models::platform::Platform;
use crate::models::search::{AggregateResponse, PlatformResult, SearchRequest};
use crate::scraping::{PlatformScraper, ScrapeError};

pub struct Aggregator {
    scrapers: BTreeMap<Platform, Arc<dyn PlatformScraper>>,
    concurrent: bool,
    platform_timeout: Duration,
}

impl Aggregator {
    pub fn new(
        scrapers: impl IntoIterator<Item = Arc<dyn PlatformScraper>>,
        concurrent: bool,
        platform_timeout: Duration,
    ) -> Self {
        let scrapers = scrapers
            .into_iter()
            .map(|scraper| (scraper.platform(), scraper))
            .collect();

        Self {
            scrapers,
            concurrent,
            platform_timeout,
        }
    }

    /// Never fails: per-platform problems end up in `errors`.
    pub async fn aggregate(&self, request: &SearchRequest) -> AggregateResponse {
        let platforms = request.requested_platforms();
        let niche = request.niche.as_str();
        let hashtags = request.hashtags.as_slice();

        let outcomes: Vec<(Platform, Result<PlatformResult, ScrapeError>)> = if self.concurrent {
            join_all(platforms.iter().map(|&platform| async move {
                (platform, self.run_platform(platform, niche, hashtags).await)
            }))
            .await
        } else {
            let mut outcomes = Vec::with_capacity(platforms.len());
            for platform in platforms {
                outcomes.push((platform, self.run_platform(platform, niche, hashtags).await));
            }
            outcomes
        };

        let mut response = AggregateResponse::default();
        for (platform, outcome) in outcomes {
            match outcome {
                Ok(result) => response.results.push(result),
                Err(e) => response
                    .errors
                    .push(format!("{}: {e}", platform.display_name())),
            }
        }
        response.insights = response
            .results
            .iter()
            .filter_map(PlatformResult::engagement_insight)
            .collect();

        info!(
            results = response.results.len(),
            errors = response.errors.len(),
            "Aggregation finished"
        );
        response
    }

    async fn run_platform(
        &self,
        platform: Platform,
        niche: &str,
        hashtags: &[String],
    ) -> Result<PlatformResult, ScrapeError> {
        let Some(scraper) = self.scrapers.get(&platform) else {
            return Err(ScrapeError::failed(platform, "no scraper registered"));
        };

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.platform_timeout, scraper.scrape(niche, hashtags))
            .await
            .unwrap_or(Err(ScrapeError::TimedOut {
                platform,
                timeout: self.platform_timeout,
            }));

        let elapsed = started.elapsed();
        let label = if outcome.is_ok() { "success" } else { "failure" };
        metrics::counter!("scrape_runs_total", "platform" => platform.id(), "outcome" => label)
            .increment(1);
        metrics::histogram!("scrape_duration_seconds", "platform" => platform.id())
            .record(elapsed.as_secs_f64());

        if let Err(e) = &outcome {
            warn!(%platform, error = %e, elapsed_ms = elapsed.as_millis(), "Platform scrape failed");
        }
        outcome
    }
}
