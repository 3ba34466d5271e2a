use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, info};
use url::Url;

use super::extract::{absolute_url, attr_of, first_within, select_all, text_of};
use super::{
    BrowserError, BrowserSession, PlatformScraper, ScrapeContext, ScrapeError, await_render,
    search_term,
};
use crate::constants::urls::YOUTUBE;
use crate::models::platform::Platform;
use crate::models::profile::ProfileCandidate;
use crate::models::search::PlatformResult;

const CHANNEL_RENDERER: &str = "ytd-channel-renderer";
const CHANNEL_NAME: &str = "#channel-title #text, #text.ytd-channel-name, #channel-title";
const CHANNEL_AVATAR: &str = "#avatar img[src], img#img[src], img[src]";
const CHANNEL_LINK: &str = "a#main-link[href], a.channel-link[href], a[href]";

/// `sp` value YouTube uses for the "Channels" result filter.
const CHANNEL_FILTER: &str = "EgIQAg==";

/// Channel-filtered search results page.
#[must_use]
pub fn search_url(term: &str) -> String {
    let base = format!("{YOUTUBE}/results");
    Url::parse_with_params(&base, &[("search_query", term), ("sp", CHANNEL_FILTER)])
        .map_or_else(
            |_| format!("{base}?search_query={}", urlencoding::encode(term)),
            |url| url.to_string(),
        )
}

/// Name, avatar and channel link from each channel renderer, capped at `limit`.
#[must_use]
pub fn extract_channels(html: &str, limit: usize) -> Vec<ProfileCandidate> {
    let doc = Html::parse_document(html);

    let channels = select_all(&doc, CHANNEL_RENDERER)
        .into_iter()
        .take(limit)
        .map(|renderer| {
            let username = first_within(renderer, CHANNEL_NAME).and_then(text_of);
            let avatar = first_within(renderer, CHANNEL_AVATAR).and_then(|img| attr_of(img, "src"));
            let profile_url = first_within(renderer, CHANNEL_LINK)
                .and_then(|a| attr_of(a, "href"))
                .and_then(|href| absolute_url(YOUTUBE, &href));
            let bio = first_within(renderer, "#description").and_then(text_of);

            ProfileCandidate {
                username,
                avatar,
                bio,
                profile_url,
            }
        })
        .collect();
    channels
}

pub struct YouTubeScraper {
    ctx: ScrapeContext,
}

impl YouTubeScraper {
    #[must_use]
    pub const fn new(ctx: ScrapeContext) -> Self {
        Self { ctx }
    }

    async fn collect(
        &self,
        session: &mut dyn BrowserSession,
        term: &str,
    ) -> Result<Vec<ProfileCandidate>, BrowserError> {
        let url = search_url(term);
        info!(platform = "youtube", %url, "Opening search results");

        session.goto(&url).await?;
        await_render(&self.ctx, Platform::YouTube, session, &[CHANNEL_RENDERER]).await?;

        let html = session.content().await?;
        let channels = extract_channels(&html, self.ctx.config().max_profiles);
        debug!(platform = "youtube", count = channels.len(), "Found channels");

        Ok(channels)
    }
}

#[async_trait]
impl PlatformScraper for YouTubeScraper {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn scrape(
        &self,
        niche: &str,
        hashtags: &[String],
    ) -> Result<PlatformResult, ScrapeError> {
        let term = search_term(niche, hashtags).ok_or(ScrapeError::MissingSearchTerm)?;

        let mut session = self
            .ctx
            .open_session()
            .await
            .map_err(|e| ScrapeError::failed(Platform::YouTube, e))?;

        let outcome = self.collect(session.as_mut(), &term).await;
        self.ctx.release(Platform::YouTube, session).await;

        let candidates = outcome.map_err(|e| ScrapeError::failed(Platform::YouTube, e))?;
        Ok(self.ctx.finish(Platform::YouTube, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;
    use crate::scraping::testing::FakeLauncher;
    use std::sync::Arc;

    fn renderer(name: &str, handle: &str) -> String {
        format!(
            r#"<ytd-channel-renderer>
                <div id="avatar"><img src="https://yt3.example/{handle}.jpg"></div>
                <a id="main-link" href="/@{handle}">
                    <div id="channel-title"><yt-formatted-string id="text">{name}</yt-formatted-string></div>
                </a>
                <yt-formatted-string id="description">All about {name}</yt-formatted-string>
            </ytd-channel-renderer>"#
        )
    }

    fn results_page(channels: &[(&str, &str)]) -> String {
        let body: String = channels.iter().map(|(n, h)| renderer(n, h)).collect();
        format!("<html><body><div id=\"contents\">{body}</div></body></html>")
    }

    #[test]
    fn search_url_filters_channels() {
        assert_eq!(
            search_url("home fitness"),
            "https://www.youtube.com/results?search_query=home+fitness&sp=EgIQAg%3D%3D"
        );
    }

    #[test]
    fn extracts_channel_fields() {
        let html = results_page(&[("Fit Daily", "fitdaily")]);
        let channels = extract_channels(&html, 5);

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].username.as_deref(), Some("Fit Daily"));
        assert_eq!(
            channels[0].avatar.as_deref(),
            Some("https://yt3.example/fitdaily.jpg")
        );
        assert_eq!(
            channels[0].profile_url.as_deref(),
            Some("https://www.youtube.com/@fitdaily")
        );
        assert_eq!(channels[0].bio.as_deref(), Some("All about Fit Daily"));
    }

    #[test]
    fn caps_channel_count() {
        let channels: Vec<(String, String)> =
            (0..8).map(|i| (format!("Chan {i}"), format!("chan{i}"))).collect();
        let refs: Vec<(&str, &str)> = channels
            .iter()
            .map(|(n, h)| (n.as_str(), h.as_str()))
            .collect();

        assert_eq!(extract_channels(&results_page(&refs), 5).len(), 5);
    }

    #[tokio::test]
    async fn scrape_returns_three_channels() {
        let html = results_page(&[("A", "a"), ("B", "b"), ("C", "c")]);
        let launcher = Arc::new(FakeLauncher::new().page(&search_url("fitness"), &html));
        let config = ScraperConfig {
            render_timeout_ms: 5,
            poll_initial_ms: 1,
            poll_max_ms: 2,
            ..ScraperConfig::default()
        };

        let result = YouTubeScraper::new(ScrapeContext::new(launcher.clone(), config))
            .scrape("fitness", &[])
            .await
            .unwrap();

        assert_eq!(result.platform, Platform::YouTube);
        assert_eq!(result.influencers.len(), 3);
        for influencer in &result.influencers {
            assert!((1_000..101_000).contains(&influencer.followers));
            assert!((2.0..=7.0).contains(&influencer.engagement_rate));
        }
        assert_eq!(launcher.closes(), 1);
    }
}
