use std::time::Duration;
use tokio::time::Instant;

use super::browser::{BrowserError, BrowserSession};
use crate::config::ScraperConfig;

/// Bounded poll-with-backoff used to detect that client-side rendering has
/// produced the content a scraper needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl WaitPolicy {
    #[must_use]
    pub const fn from_config(config: &ScraperConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.render_timeout_ms),
            initial_interval: Duration::from_millis(config.poll_initial_ms),
            max_interval: Duration::from_millis(config.poll_max_ms),
        }
    }
}

/// Polls until one of `selectors` matches, returning the one that did.
///
/// `Ok(None)` means the timeout elapsed first. The interval doubles after
/// every miss, capped at `max_interval`, and never sleeps past the deadline.
pub async fn wait_for_any(
    session: &mut dyn BrowserSession,
    selectors: &[&str],
    policy: &WaitPolicy,
) -> Result<Option<String>, BrowserError> {
    let deadline = Instant::now() + policy.timeout;
    let mut interval = policy.initial_interval.max(Duration::from_millis(1));

    loop {
        for selector in selectors {
            if session.has_element(selector).await? {
                return Ok(Some((*selector).to_string()));
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }

        tokio::time::sleep(interval.min(deadline - now)).await;
        interval = (interval * 2).min(policy.max_interval.max(interval));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::testing::FakeSession;

    fn policy(timeout_ms: u64) -> WaitPolicy {
        WaitPolicy {
            timeout: Duration::from_millis(timeout_ms),
            initial_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn returns_matching_selector() {
        let mut session = FakeSession::with_page("<div class=\"grid\"><a href=\"/p/1\">x</a></div>");
        let found = wait_for_any(&mut session, &["article", "div.grid"], &policy(50))
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("div.grid"));
    }

    #[tokio::test]
    async fn polls_until_content_appears() {
        let mut session = FakeSession::with_page("<main></main>").appearing_after(3);
        let found = wait_for_any(&mut session, &["main"], &policy(500))
            .await
            .unwrap();
        assert_eq!(found.as_deref(), Some("main"));
        assert!(session.polls() >= 4);
    }

    #[tokio::test]
    async fn gives_up_after_timeout() {
        let mut session = FakeSession::with_page("<main></main>");
        let started = Instant::now();
        let found = wait_for_any(&mut session, &["ytd-channel-renderer"], &policy(20))
            .await
            .unwrap();
        assert!(found.is_none());
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
