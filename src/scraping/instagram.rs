use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use std::sync::OnceLock;
use tokio::time::Instant;
use tracing::{debug, info};

use super::extract::{absolute_url, attr_of, first_within, select_all, select_within, text_of};
use super::{
    BrowserError, BrowserSession, PlatformScraper, ScrapeContext, ScrapeError, await_render,
    search_term,
};
use crate::constants::urls::INSTAGRAM;
use crate::models::platform::Platform;
use crate::models::profile::ProfileCandidate;
use crate::models::search::PlatformResult;

const GRID_READY: &[&str] = &["article a[href*=\"/p/\"]", "a[href*=\"/p/\"]"];
const POST_READY: &[&str] = &["article header a[href]", "header a[href]"];

/// Path segments that look like usernames but are site sections.
const RESERVED_PATHS: &[&str] = &["explore", "p", "reel", "reels", "stories", "accounts", "direct"];

fn profile_path_regex() -> Option<&'static Regex> {
    static INSTANCE: OnceLock<Option<Regex>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| {
            Regex::new(r"^(?:https?://(?:www\.)?instagram\.com)?/([A-Za-z0-9._]{1,30})/?$").ok()
        })
        .as_ref()
}

/// Hashtag explore page. Tags cannot contain whitespace, so it is removed.
#[must_use]
pub fn tag_url(term: &str) -> String {
    let tag: String = term.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{INSTAGRAM}/explore/tags/{}/", urlencoding::encode(&tag))
}

fn username_from_href(href: &str) -> Option<String> {
    let name = profile_path_regex()?.captures(href)?.get(1)?.as_str();
    (!RESERVED_PATHS.contains(&name)).then(|| name.to_string())
}

/// Post permalinks from the hashtag grid, absolute and deduplicated.
#[must_use]
pub fn extract_post_links(html: &str, limit: usize) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();

    select_all(&doc, "a[href*=\"/p/\"]")
        .into_iter()
        .filter_map(|a| attr_of(a, "href"))
        .filter_map(|href| absolute_url(INSTAGRAM, &href))
        .filter(|url| seen.insert(url.clone()))
        .take(limit)
        .collect()
}

/// Author of a post page: username and avatar from the post header, bio
/// from the caption.
#[must_use]
pub fn extract_post_author(html: &str) -> Option<ProfileCandidate> {
    let doc = Html::parse_document(html);
    let header = select_all(&doc, "article header")
        .into_iter()
        .chain(select_all(&doc, "header"))
        .next()?;

    let username = select_within(header, "a[href]")
        .into_iter()
        .filter_map(|a| attr_of(a, "href"))
        .find_map(|href| username_from_href(&href))?;

    let avatar = first_within(header, "img[src]").and_then(|img| attr_of(img, "src"));

    let bio = select_all(&doc, "article h1")
        .into_iter()
        .chain(select_all(&doc, "h1"))
        .find_map(text_of);

    Some(ProfileCandidate {
        profile_url: Some(format!("{INSTAGRAM}/{username}/")),
        username: Some(username),
        avatar,
        bio,
    })
}

pub struct InstagramScraper {
    ctx: ScrapeContext,
}

impl InstagramScraper {
    #[must_use]
    pub const fn new(ctx: ScrapeContext) -> Self {
        Self { ctx }
    }

    /// Post visits stop at `deadline`; profiles gathered by then are kept.
    async fn collect(
        &self,
        session: &mut dyn BrowserSession,
        term: &str,
        deadline: Instant,
    ) -> Result<Vec<ProfileCandidate>, BrowserError> {
        let url = tag_url(term);
        info!(platform = "instagram", %url, "Opening hashtag page");

        session.goto(&url).await?;
        await_render(&self.ctx, Platform::Instagram, session, GRID_READY).await?;

        let html = session.content().await?;
        let posts = extract_post_links(&html, self.ctx.config().instagram_max_posts);
        debug!(platform = "instagram", count = posts.len(), "Found posts");

        let max_profiles = self.ctx.config().max_profiles;
        let mut seen = HashSet::new();
        let mut profiles = Vec::new();

        for post in posts {
            if profiles.len() >= max_profiles {
                break;
            }

            let Ok(visit) = tokio::time::timeout_at(deadline, self.visit_post(session, &post)).await
            else {
                info!(
                    platform = "instagram",
                    collected = profiles.len(),
                    "Post budget spent, returning partial results"
                );
                break;
            };

            match visit {
                Ok(Some(candidate)) => {
                    let is_new = candidate
                        .username
                        .as_ref()
                        .is_some_and(|name| seen.insert(name.clone()));
                    if is_new {
                        profiles.push(candidate);
                    }
                }
                Ok(None) => debug!(%post, "No author on post page"),
                Err(e) => debug!(%post, error = %e, "Skipping post"),
            }
        }

        Ok(profiles)
    }

    async fn visit_post(
        &self,
        session: &mut dyn BrowserSession,
        post_url: &str,
    ) -> Result<Option<ProfileCandidate>, BrowserError> {
        session.goto(post_url).await?;
        await_render(&self.ctx, Platform::Instagram, session, POST_READY).await?;
        let html = session.content().await?;
        Ok(extract_post_author(&html))
    }
}

#[async_trait]
impl PlatformScraper for InstagramScraper {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn scrape(
        &self,
        niche: &str,
        hashtags: &[String],
    ) -> Result<PlatformResult, ScrapeError> {
        let term = search_term(niche, hashtags).ok_or(ScrapeError::MissingSearchTerm)?;
        let deadline = Instant::now() + self.ctx.config().collection_budget();

        let mut session = self
            .ctx
            .open_session()
            .await
            .map_err(|e| ScrapeError::failed(Platform::Instagram, e))?;

        let outcome = self.collect(session.as_mut(), &term, deadline).await;
        self.ctx.release(Platform::Instagram, session).await;

        let candidates = outcome.map_err(|e| ScrapeError::failed(Platform::Instagram, e))?;
        Ok(self.ctx.finish(Platform::Instagram, candidates))
    }
}
