//! Headless browser sessions used by the platform scrapers.
//!
//! Scrapers only see the [`BrowserLauncher`] / [`BrowserSession`] traits, so the
//! extraction flow can run against canned pages in tests and against Chromium
//! in production ([`super::chromium::ChromiumLauncher`]).

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::time::Duration;
use thiserror::Error;

use super::cookies::BrowserCookie;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {}s", .timeout.as_secs())]
    NavigationTimeout { url: String, timeout: Duration },

    #[error("Browser protocol error: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub user_agent: String,
}

impl LaunchOptions {
    /// Picks a user agent uniformly at random from `pool`.
    ///
    /// Falls back to the first built-in agent when the pool is empty.
    #[must_use]
    pub fn with_random_user_agent(pool: &[String]) -> Self {
        let user_agent = pool.choose(&mut rand::rng()).cloned().unwrap_or_else(|| {
            crate::constants::DEFAULT_USER_AGENTS[0].to_string()
        });
        Self { user_agent }
    }
}

/// Starts isolated browser sessions. Sessions are never shared or pooled.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One browser with a single active page.
///
/// Callers must call [`BrowserSession::close`] on every exit path.
#[async_trait]
pub trait BrowserSession: Send {
    async fn set_cookies(&mut self, cookies: &[BrowserCookie]) -> Result<(), BrowserError>;

    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Whether `selector` currently matches anything on the page.
    async fn has_element(&mut self, selector: &str) -> Result<bool, BrowserError>;

    /// Serialized DOM of the current page.
    async fn content(&mut self) -> Result<String, BrowserError>;

    async fn close(&mut self) -> Result<(), BrowserError>;
}
