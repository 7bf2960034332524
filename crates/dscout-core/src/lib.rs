pub mod app_config;
pub mod records;
pub mod stores;

pub use app_config::{AppConfig, ConfigError, Environment};
pub use records::CouponRecord;
pub use stores::{NormalizedCoupon, NormalizedStore};
