use rand::Rng;

use crate::constants::synthetic::{ENGAGEMENT_RATE, FOLLOWERS};
use crate::models::profile::{AudienceMetrics, MetricsSource};

/// Placeholder audience figures for a scraped profile.
///
/// Followers are uniform in `[1000, 101000)`, engagement uniform in
/// `[2.0, 7.0)` rounded to two decimals. Tagged [`MetricsSource::Synthetic`].
pub fn synthesize_metrics<R: Rng + ?Sized>(rng: &mut R) -> AudienceMetrics {
    let followers = rng.random_range(FOLLOWERS);
    let engagement_rate = (rng.random_range(ENGAGEMENT_RATE) * 100.0).round() / 100.0;

    AudienceMetrics {
        followers,
        engagement_rate,
        source: MetricsSource::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn stays_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let metrics = synthesize_metrics(&mut rng);
            assert!((1_000..101_000).contains(&metrics.followers));
            assert!((2.0..=7.0).contains(&metrics.engagement_rate));
            assert_eq!(metrics.source, MetricsSource::Synthetic);
        }
    }

    #[test]
    fn engagement_has_two_decimals() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let rate = synthesize_metrics(&mut rng).engagement_rate;
            let scaled = rate * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }
}
