//! In-memory browser used by the scraper unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::browser::{BrowserError, BrowserLauncher, BrowserSession, LaunchOptions};
use super::cookies::BrowserCookie;
use super::extract::select_all;

fn document_has(html: &str, css: &str) -> bool {
    let doc = scraper::Html::parse_document(html);
    !select_all(&doc, css).is_empty()
}

#[derive(Default)]
pub struct FakeSession {
    pages: HashMap<String, String>,
    current: Option<String>,
    hidden_polls: usize,
    polls: usize,
    cookies: Arc<Mutex<Vec<BrowserCookie>>>,
    closes: Arc<AtomicUsize>,
    navigations: Arc<AtomicUsize>,
}

impl FakeSession {
    pub fn with_page(html: &str) -> Self {
        Self {
            current: Some(html.to_string()),
            ..Default::default()
        }
    }

    /// Report no matches for the first `polls` selector checks.
    pub const fn appearing_after(mut self, polls: usize) -> Self {
        self.hidden_polls = polls;
        self
    }

    pub const fn polls(&self) -> usize {
        self.polls
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn set_cookies(&mut self, cookies: &[BrowserCookie]) -> Result<(), BrowserError> {
        if let Ok(mut jar) = self.cookies.lock() {
            jar.extend_from_slice(cookies);
        }
        Ok(())
    }

    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        self.navigations.fetch_add(1, Ordering::SeqCst);
        let page = self.pages.get(url).ok_or_else(|| BrowserError::Navigation {
            url: url.to_string(),
            message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
        })?;
        self.current = Some(page.clone());
        Ok(())
    }

    async fn has_element(&mut self, selector: &str) -> Result<bool, BrowserError> {
        self.polls += 1;
        if self.polls <= self.hidden_polls {
            return Ok(false);
        }
        Ok(self
            .current
            .as_deref()
            .is_some_and(|html| document_has(html, selector)))
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.current
            .clone()
            .ok_or_else(|| BrowserError::Protocol("no page loaded".to_string()))
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Serves a fixed URL → HTML map to every session it launches.
#[derive(Default)]
pub struct FakeLauncher {
    pages: HashMap<String, String>,
    launches: AtomicUsize,
    closes: Arc<AtomicUsize>,
    navigations: Arc<AtomicUsize>,
    cookies: Arc<Mutex<Vec<BrowserCookie>>>,
    fail_launch: bool,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Default::default()
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// `goto` calls across every launched session, failed ones included.
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn cookies(&self) -> Vec<BrowserCookie> {
        self.cookies.lock().map(|jar| jar.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, _options: LaunchOptions) -> Result<Box<dyn BrowserSession>, BrowserError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(BrowserError::Launch("chrome not found".to_string()));
        }
        Ok(Box::new(FakeSession {
            pages: self.pages.clone(),
            cookies: Arc::clone(&self.cookies),
            closes: Arc::clone(&self.closes),
            navigations: Arc::clone(&self.navigations),
            ..Default::default()
        }))
    }
}

