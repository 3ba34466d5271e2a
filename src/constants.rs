pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

pub mod cache {

    pub const RESPONSE_TTL_MINUTES: u64 = 30;
}

pub mod limits {

    pub const MAX_PROFILES_PER_PLATFORM: usize = 5;

    pub const INSTAGRAM_MAX_POSTS: usize = 10;
}

pub mod synthetic {
    use std::ops::Range;

    pub const FOLLOWERS: Range<u64> = 1_000..101_000;

    pub const ENGAGEMENT_RATE: Range<f64> = 2.0..7.0;
}

pub mod urls {

    pub const INSTAGRAM: &str = "https://www.instagram.com";

    pub const TIKTOK: &str = "https://www.tiktok.com";

    pub const YOUTUBE: &str = "https://www.youtube.com";
}
