pub mod client;
pub mod discount;
pub mod error;
pub mod normalize;
pub mod popularity;
pub mod types;

pub use client::AffiliateClient;
pub use discount::{best_offer, parse_discount, percent_stats, DiscountStats, ParsedDiscount};
pub use error::AffiliateError;
pub use normalize::{normalize_merchant, normalize_offer, parse_api_date, slugify};
pub use popularity::{compute_popularity, derive_rating, is_featured, FEATURED_THRESHOLD};
pub use types::{ApiEnvelope, PageMeta, RawMerchant, RawOffer};
