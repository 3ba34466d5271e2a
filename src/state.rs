use std::sync::Arc;

use crate::config::Config;
use crate::scraping::{
    BrowserLauncher, ChromiumLauncher, InstagramScraper, PlatformScraper, ScrapeContext,
    TikTokScraper, YouTubeScraper,
};
use crate::services::{
    Aggregator, CompetitorSearchService, DefaultCompetitorSearchService, GoogleOAuthService,
    MemoryResponseCache, ResponseCache, YouTubeOAuthService,
};

/// Build a shared HTTP client for outbound API calls.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Trendscout/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub response_cache: Arc<dyn ResponseCache>,

    pub competitor_search: Arc<dyn CompetitorSearchService>,

    pub youtube_oauth: Arc<dyn YouTubeOAuthService>,
}

impl SharedState {
    /// Production wiring: one Chromium launcher shared by all three scrapers.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let launcher: Arc<dyn BrowserLauncher> = Arc::new(ChromiumLauncher::new(&config.scraper));
        Self::with_launcher(config, launcher)
    }

    pub fn with_launcher(
        config: Config,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> anyhow::Result<Self> {
        let ctx = ScrapeContext::new(launcher, config.scraper.clone());
        let scrapers: Vec<Arc<dyn PlatformScraper>> = vec![
            Arc::new(InstagramScraper::new(ctx.clone())),
            Arc::new(TikTokScraper::new(ctx.clone())),
            Arc::new(YouTubeScraper::new(ctx)),
        ];
        Self::with_scrapers(config, scrapers)
    }

    /// Wires the services around an arbitrary scraper set.
    pub fn with_scrapers(
        config: Config,
        scrapers: Vec<Arc<dyn PlatformScraper>>,
    ) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(30)?;

        let aggregator = Arc::new(Aggregator::new(
            scrapers,
            config.scraper.concurrent,
            config.scraper.platform_timeout(),
        ));

        let response_cache: Arc<dyn ResponseCache> =
            Arc::new(MemoryResponseCache::from_config(&config.cache));

        let competitor_search: Arc<dyn CompetitorSearchService> =
            Arc::new(DefaultCompetitorSearchService::new(
                aggregator,
                response_cache.clone(),
                &config.cache,
            ));

        let youtube_oauth: Arc<dyn YouTubeOAuthService> = Arc::new(GoogleOAuthService::new(
            http_client,
            config.youtube_oauth.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            response_cache,
            competitor_search,
            youtube_oauth,
        })
    }
}
