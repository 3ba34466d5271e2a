pub mod platform;
pub mod profile;
pub mod search;

pub use platform::Platform;
pub use profile::{AudienceMetrics, InfluencerProfile, MetricsSource, ProfileCandidate};
pub use search::{AggregateResponse, PlatformResult, SearchRequest};
