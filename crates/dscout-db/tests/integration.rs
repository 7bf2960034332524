//! Offline unit tests for dscout-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use dscout_core::{AppConfig, Environment};
use dscout_db::{CouponRow, PoolConfig, StoreRow};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: Some("postgres://example".to_string()),
        env: Environment::Test,
        log_level: "info".to_string(),
        affiliate_api_base: "https://api.network.example/api.php".to_string(),
        affiliate_user: "u1".to_string(),
        affiliate_key: Some("k1".to_string()),
        affiliate_page_size: 100,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        sync_inter_request_delay_ms: 250,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`StoreRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn store_row_has_expected_fields() {
    let row = StoreRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        external_id: "42".to_string(),
        name: "Dr. Squatch".to_string(),
        alias: "dr-squatch".to_string(),
        logo_url: Some("https://cdn.network.example/42.png".to_string()),
        website: Some("drsquatch.com".to_string()),
        url: None,
        description: None,
        domains_data: serde_json::json!([]),
        countries_data: serde_json::json!([]),
        commission_data: serde_json::json!({}),
        active_offers_count: 12,
        popularity: 70,
        is_featured: true,
        rating: Some(4.6),
        review_count: Some(163),
        best_offer: Some("25% off".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.external_id, "42");
    assert_eq!(row.alias, "dr-squatch");
    assert!(row.is_featured);
    assert_eq!(row.active_offers_count, 12);
}

/// Compile-time smoke test for [`CouponRow`].
#[test]
fn coupon_row_has_expected_fields() {
    let row = CouponRow {
        id: 1_i64,
        external_id: "ofr-7".to_string(),
        store_id: 1_i64,
        title: "Save 25% Off orders".to_string(),
        code: Some("SQUATCH25".to_string()),
        coupon_type: "code".to_string(),
        description: None,
        discount_value: Some("25% off".to_string()),
        url: None,
        starts_at: None,
        expires_at: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    assert_eq!(row.coupon_type, "code");
    assert!(row.is_active);
    assert_eq!(row.discount_value.as_deref(), Some("25% off"));
}
