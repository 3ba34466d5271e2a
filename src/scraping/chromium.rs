use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::browser::{BrowserError, BrowserLauncher, BrowserSession, LaunchOptions};
use super::cookies::BrowserCookie;
use crate::config::ScraperConfig;

/// Launches a fresh headless Chromium process per session.
pub struct ChromiumLauncher {
    chrome_executable: Option<PathBuf>,
    navigation_timeout: Duration,
}

impl ChromiumLauncher {
    #[must_use]
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            chrome_executable: config.chrome_executable.as_ref().map(PathBuf::from),
            navigation_timeout: config.navigation_timeout(),
        }
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self, options: LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        // Sandbox flags are required when running inside containers.
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--user-agent={}", options.user_agent));

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(BrowserError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!(error = %close_err, "Failed to close browser after page error");
                }
                handler.abort();
                return Err(BrowserError::Launch(format!("Failed to open page: {e}")));
            }
        };

        debug!(user_agent = %options.user_agent, "Chromium session started");

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler,
            navigation_timeout: self.navigation_timeout,
            closed: false,
        }))
    }
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
    closed: bool,
}

fn to_cookie_param(cookie: &BrowserCookie) -> Result<CookieParam, BrowserError> {
    let mut builder = CookieParam::builder()
        .name(cookie.name.clone())
        .value(cookie.value.clone());

    if let Some(domain) = &cookie.domain {
        builder = builder.domain(domain.clone());
    }
    if let Some(path) = &cookie.path {
        builder = builder.path(path.clone());
    }
    if let Some(secure) = cookie.secure {
        builder = builder.secure(secure);
    }
    if let Some(http_only) = cookie.http_only {
        builder = builder.http_only(http_only);
    }

    builder.build().map_err(BrowserError::Protocol)
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn set_cookies(&mut self, cookies: &[BrowserCookie]) -> Result<(), BrowserError> {
        let params = cookies
            .iter()
            .map(to_cookie_param)
            .collect::<Result<Vec<_>, _>>()?;

        self.page
            .set_cookies(params)
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))?;
        Ok(())
    }

    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout: self.navigation_timeout,
            }),
        }
    }

    async fn has_element(&mut self, selector: &str) -> Result<bool, BrowserError> {
        Ok(self.page.find_element(selector).await.is_ok())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Protocol(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Protocol(e.to_string()));

        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "Waiting for Chromium exit failed");
        }
        self.handler.abort();
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // Dropping `Browser` kills a still-running child process.
        if !self.closed {
            warn!("Chromium session dropped without close");
        }
        self.handler.abort();
    }
}
