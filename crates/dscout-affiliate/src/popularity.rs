//! Derived store statistics: the popularity score, the featured flag, and
//! the placeholder rating/review values.
//!
//! The rating and review count have no upstream source — the original
//! product surfaced invented review data. They are kept for schema parity
//! but derived deterministically from the store's external id and offer
//! count, so repeated syncs never churn the values. See DESIGN.md.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Score at or above which a store is featured.
pub const FEATURED_THRESHOLD: u8 = 50;

const LOGO_BONUS: u8 = 30;
const DESCRIPTION_BONUS: u8 = 15;
const WEBSITE_BONUS: u8 = 15;

/// Computes the 0–100 popularity score: logo presence, metadata
/// completeness, and a capped coupon-count tier bonus.
#[must_use]
pub fn compute_popularity(
    has_logo: bool,
    has_description: bool,
    has_website: bool,
    active_offers: i64,
) -> u8 {
    let mut score = 0u8;
    if has_logo {
        score += LOGO_BONUS;
    }
    if has_description {
        score += DESCRIPTION_BONUS;
    }
    if has_website {
        score += WEBSITE_BONUS;
    }
    score += offer_tier_bonus(active_offers);
    score.min(100)
}

/// Coupon-count tier bonus, capped at 40.
fn offer_tier_bonus(active_offers: i64) -> u8 {
    match active_offers {
        i64::MIN..=0 => 0,
        1..=4 => 15,
        5..=9 => 30,
        _ => 40,
    }
}

/// Whether a score crosses the featured threshold.
#[must_use]
pub fn is_featured(score: u8) -> bool {
    score >= FEATURED_THRESHOLD
}

/// Derives the placeholder rating (one decimal, 3.5–5.0) and review count
/// for a store. Deterministic: the RNG is seeded from a hash of the
/// external id and the offer count, never from entropy.
#[must_use]
pub fn derive_rating(external_id: &str, active_offers: i64) -> (f64, i32) {
    let mut hasher = Sha256::new();
    hasher.update(external_id.as_bytes());
    hasher.update(active_offers.to_le_bytes());
    let seed: [u8; 32] = hasher.finalize().into();

    let mut rng = StdRng::from_seed(seed);
    let rating = (rng.random_range(3.5..=5.0_f64) * 10.0).round() / 10.0;

    let base = i32::try_from(active_offers.clamp(0, 1000)).unwrap_or(0) * 12;
    let review_count = base + rng.random_range(5..=40);

    (rating, review_count)
}
