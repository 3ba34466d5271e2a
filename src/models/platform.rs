use serde::{Deserialize, Serialize};
use std::fmt;

/// Social platform a competitor search can target.
///
/// Variant order is the order results and errors are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
}

impl Platform {
    pub const ALL: [Self; 3] = [Self::Instagram, Self::TikTok, Self::YouTube];

    /// Wire identifier, as accepted in `platforms` and used in insights.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
        }
    }

    /// Human-facing name used in error messages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Instagram => "Instagram",
            Self::TikTok => "TikTok",
            Self::YouTube => "YouTube",
        }
    }

    /// Exact, case-sensitive match against the wire identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_id_is_exact() {
        assert_eq!(Platform::from_id("tiktok"), Some(Platform::TikTok));
        assert_eq!(Platform::from_id("TikTok"), None);
        assert_eq!(Platform::from_id("twitter"), None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Platform::YouTube).unwrap();
        assert_eq!(json, "\"youtube\"");
    }

    #[test]
    fn ordering_matches_report_order() {
        let mut platforms = vec![Platform::YouTube, Platform::Instagram, Platform::TikTok];
        platforms.sort();
        assert_eq!(platforms, Platform::ALL.to_vec());
    }
}
