use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use super::cookies::load_cookie_file;
use super::extract::{attr_of, first_within, select_all, text_of};
use super::{
    BrowserError, BrowserSession, PlatformScraper, ScrapeContext, ScrapeError, await_render,
    search_term,
};
use crate::constants::urls::TIKTOK;
use crate::models::platform::Platform;
use crate::models::profile::ProfileCandidate;
use crate::models::search::PlatformResult;

const VIDEO_CARDS: &str = "[data-e2e=\"challenge-item\"], [data-e2e=\"search_video-item\"], [data-e2e=\"search_top-item\"]";
const USER_CARDS: &str = "[data-e2e=\"search-user-container\"], [data-e2e=\"user-card\"]";
const PROFILE_LINKS: &str = "a[href*=\"/@\"]";

const READY: &[&str] = &[
    "[data-e2e=\"challenge-item\"]",
    "[data-e2e=\"search-user-container\"]",
    "a[href*=\"/@\"]",
];

fn username_regex() -> Option<&'static Regex> {
    static INSTANCE: OnceLock<Option<Regex>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| Regex::new(r"/@([A-Za-z0-9._-]+)").ok())
        .as_ref()
}

/// Username from the path segment after `/@`.
#[must_use]
pub fn username_from_url(url: &str) -> Option<String> {
    Some(username_regex()?.captures(url)?.get(1)?.as_str().to_string())
}

#[must_use]
pub fn tag_url(term: &str) -> String {
    let tag: String = term.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{TIKTOK}/tag/{}", urlencoding::encode(&tag))
}

fn candidate_from_card(card: ElementRef<'_>) -> Option<ProfileCandidate> {
    let link = if card.value().name() == "a" {
        Some(card)
    } else {
        first_within(card, PROFILE_LINKS)
    }?;
    let username = username_from_url(&attr_of(link, "href")?)?;

    let avatar = first_within(card, "img[src]").and_then(|img| attr_of(img, "src"));
    let bio = first_within(card, "[data-e2e=\"search-user-desc\"], [data-e2e=\"user-desc\"]")
        .and_then(text_of);

    Some(ProfileCandidate {
        profile_url: Some(format!("{TIKTOK}/@{username}")),
        username: Some(username),
        avatar,
        bio,
    })
}

/// Tries video cards, then user cards, then bare profile links; the first
/// strategy that yields anything wins.
#[must_use]
pub fn extract_profiles(html: &str) -> Vec<ProfileCandidate> {
    let doc = Html::parse_document(html);

    [VIDEO_CARDS, USER_CARDS, PROFILE_LINKS]
        .into_iter()
        .map(|strategy| {
            select_all(&doc, strategy)
                .into_iter()
                .filter_map(candidate_from_card)
                .collect::<Vec<_>>()
        })
        .find(|candidates| !candidates.is_empty())
        .unwrap_or_default()
}

pub struct TikTokScraper {
    ctx: ScrapeContext,
}

impl TikTokScraper {
    #[must_use]
    pub const fn new(ctx: ScrapeContext) -> Self {
        Self { ctx }
    }

    async fn collect(
        &self,
        session: &mut dyn BrowserSession,
        term: &str,
    ) -> Result<Vec<ProfileCandidate>, BrowserError> {
        let cookie_path = Path::new(&self.ctx.config().tiktok_cookie_path);
        if let Some(cookies) = load_cookie_file(cookie_path).await
            && let Err(e) = session.set_cookies(&cookies).await
        {
            warn!(platform = "tiktok", error = %e, "Could not apply saved cookies");
        }

        let url = tag_url(term);
        info!(platform = "tiktok", %url, "Opening tag page");

        session.goto(&url).await?;
        await_render(&self.ctx, Platform::TikTok, session, READY).await?;

        let html = session.content().await?;
        let candidates = extract_profiles(&html);
        debug!(platform = "tiktok", count = candidates.len(), "Found profile candidates");

        Ok(candidates)
    }
}

#[async_trait]
impl PlatformScraper for TikTokScraper {
    fn platform(&self) -> Platform {
        Platform::TikTok
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
            .map_err(|e| ScrapeError::failed(Platform::TikTok, e))?;

        let outcome = self.collect(session.as_mut(), &term).await;
        self.ctx.release(Platform::TikTok, session).await;

        let candidates = outcome.map_err(|e| ScrapeError::failed(Platform::TikTok, e))?;
        Ok(self.ctx.finish(Platform::TikTok, candidates))
    }
}
