//! Small DOM helpers shared by the platform extractors.
//!
//! Everything here works on already-rendered HTML and returns owned data, so
//! parsed documents never live across an `.await`.

use scraper::{ElementRef, Html, Selector};
use url::Url;

pub fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    Selector::parse(css)
        .map(|selector| doc.select(&selector).collect())
        .unwrap_or_default()
}

pub fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    Selector::parse(css)
        .map(|selector| element.select(&selector).collect())
        .unwrap_or_default()
}

pub fn first_within<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    select_within(element, css).into_iter().next()
}

/// Visible text with runs of whitespace collapsed; `None` when blank.
pub fn text_of(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

pub fn attr_of(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Resolves `href` against `base`, dropping query and fragment.
pub fn absolute_url(base: &str, href: &str) -> Option<String> {
    let mut url = Url::parse(base).ok()?.join(href).ok()?;
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_strips_query() {
        assert_eq!(
            absolute_url("https://www.instagram.com", "/p/Cx1/?utm=1#c").as_deref(),
            Some("https://www.instagram.com/p/Cx1/")
        );
        assert_eq!(
            absolute_url("https://www.youtube.com", "https://www.youtube.com/@chan").as_deref(),
            Some("https://www.youtube.com/@chan")
        );
    }

    #[test]
    fn text_is_collapsed() {
        let doc = Html::parse_fragment("<p>  Coach \n  <b>Amy</b>  </p>");
        let p = select_all(&doc, "p")[0];
        assert_eq!(text_of(p).as_deref(), Some("Coach Amy"));
    }

    #[test]
    fn blank_values_are_none() {
        let doc = Html::parse_fragment("<img src=\"  \"><span>   </span>");
        assert!(attr_of(select_all(&doc, "img")[0], "src").is_none());
        assert!(text_of(select_all(&doc, "span")[0]).is_none());
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let doc = Html::parse_fragment("<div></div>");
        assert!(select_all(&doc, "div[[").is_empty());
    }
}
