use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// A cookie as exported by common browser tooling (`name`, `value`,
/// `domain`, `path`, `httpOnly`, ...). Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(default)]
    pub http_only: Option<bool>,
}

/// Reads a persisted cookie jar. A missing or unreadable file is not an
/// error: scraping continues anonymously.
pub async fn load_cookie_file(path: &Path) -> Option<Vec<BrowserCookie>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Cookie file not found, continuing without cookies");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read cookie file");
            return None;
        }
    };

    match serde_json::from_str::<Vec<BrowserCookie>>(&content) {
        Ok(cookies) => {
            debug!(path = %path.display(), count = cookies.len(), "Loaded cookies");
            Some(cookies)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid cookie file, ignoring");
            None
        }
    }
}
