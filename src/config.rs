use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::constants;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub cache: CacheConfig,

    pub scraper: ScraperConfig,

    pub youtube_oauth: YouTubeOAuthConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8787,
            cors_allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_minutes: u64,

    /// Upper bound on cached responses. `None` keeps every entry until it expires.
    pub max_entries: Option<u64>,

    /// Sort and dedup `platforms` before deriving the cache key.
    /// Off by default: reordering platforms deliberately yields a fresh scrape.
    pub canonicalize_keys: bool,

    /// Let concurrent identical searches share one scrape instead of racing.
    pub coalesce_requests: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: constants::cache::RESPONSE_TTL_MINUTES,
            max_entries: None,
            canonicalize_keys: false,
            coalesce_requests: true,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Chrome/Chromium binary. Auto-detected when unset.
    pub chrome_executable: Option<String>,

    pub navigation_timeout_secs: u64,

    /// How long to poll for a platform's content selector after navigation.
    pub render_timeout_ms: u64,

    pub poll_initial_ms: u64,

    pub poll_max_ms: u64,

    /// Hard ceiling for one platform's whole scrape.
    pub platform_timeout_ms: u64,

    /// Run the requested platforms at the same time rather than one by one.
    pub concurrent: bool,

    pub max_profiles: usize,

    pub instagram_max_posts: usize,

    pub tiktok_cookie_path: String,

    pub user_agents: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            chrome_executable: None,
            navigation_timeout_secs: 60,
            render_timeout_ms: 8_000,
            poll_initial_ms: 250,
            poll_max_ms: 2_000,
            platform_timeout_ms: 120_000,
            concurrent: true,
            max_profiles: constants::limits::MAX_PROFILES_PER_PLATFORM,
            instagram_max_posts: constants::limits::INSTAGRAM_MAX_POSTS,
            tiktok_cookie_path: "./tiktok_cookies.json".to_string(),
            user_agents: constants::DEFAULT_USER_AGENTS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl ScraperConfig {
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub const fn platform_timeout(&self) -> Duration {
        Duration::from_millis(self.platform_timeout_ms)
    }

    /// Share of [`Self::platform_timeout`] a multi-page scrape may spend
    /// navigating before it stops and returns what it has collected.
    #[must_use]
    pub fn collection_budget(&self) -> Duration {
        self.platform_timeout() * 3 / 4
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeOAuthConfig {
    pub client_id: String,

    #[serde(skip_serializing)]
    pub client_secret: String,

    pub redirect_uri: String,

    pub scopes: Vec<String>,

    pub auth_endpoint: String,

    pub token_endpoint: String,
}

impl Default for YouTubeOAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:5173/youtube/callback".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/youtube.readonly".to_string(),
                "https://www.googleapis.com/auth/yt-analytics.readonly".to_string(),
            ],
            auth_endpoint: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_endpoint: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

impl YouTubeOAuthConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Secrets usually live in the environment (or `.env`) rather than the file.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(id) = std::env::var("YOUTUBE_CLIENT_ID") {
            self.youtube_oauth.client_id = id;
        }
        if let Ok(secret) = std::env::var("YOUTUBE_CLIENT_SECRET") {
            self.youtube_oauth.client_secret = secret;
        }
        if let Ok(uri) = std::env::var("YOUTUBE_REDIRECT_URI") {
            self.youtube_oauth.redirect_uri = uri;
        }
        if let Ok(port) = std::env::var("TRENDSCOUT_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid TRENDSCOUT_PORT: {port}"))?;
        }
        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("trendscout").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".trendscout").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.ttl_minutes == 0 {
            anyhow::bail!("Cache TTL must be > 0 minutes");
        }

        if self.scraper.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            anyhow::bail!("At least one scraper user agent must be configured");
        }

        if self.scraper.max_profiles == 0 {
            anyhow::bail!("scraper.max_profiles must be > 0");
        }

        if self.scraper.platform_timeout_ms == 0 {
            anyhow::bail!("scraper.platform_timeout_ms must be > 0");
        }

        if self.scraper.poll_initial_ms > self.scraper.poll_max_ms {
            anyhow::bail!("scraper.poll_initial_ms cannot exceed scraper.poll_max_ms");
        }

        Ok(())
    }
}
