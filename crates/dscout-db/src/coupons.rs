//! Database operations for the `coupons` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `coupons` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CouponRow {
    pub id: i64,
    pub external_id: String,
    pub store_id: i64,
    pub title: String,
    pub code: Option<String>,
    pub coupon_type: String,
    pub description: Option<String>,
    pub discount_value: Option<String>,
    pub url: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Upserts a coupon row keyed by `external_id`, owned by `store_id`.
///
/// Conflicts update every synced column in place and refresh `updated_at`:
/// the same external id arriving on a later sync must never create a
/// second row.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_coupon(
    pool: &PgPool,
    store_id: i64,
    coupon: &dscout_core::NormalizedCoupon,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO coupons \
             (external_id, store_id, title, code, coupon_type, description, \
              discount_value, url, starts_at, expires_at, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (external_id) DO UPDATE SET \
             store_id       = EXCLUDED.store_id, \
             title          = EXCLUDED.title, \
             code           = EXCLUDED.code, \
             coupon_type    = EXCLUDED.coupon_type, \
             description    = EXCLUDED.description, \
             discount_value = EXCLUDED.discount_value, \
             url            = EXCLUDED.url, \
             starts_at      = EXCLUDED.starts_at, \
             expires_at     = EXCLUDED.expires_at, \
             is_active      = EXCLUDED.is_active, \
             updated_at     = NOW() \
         RETURNING id",
    )
    .bind(&coupon.external_id)
    .bind(store_id)
    .bind(&coupon.title)
    .bind(&coupon.code)
    .bind(coupon.coupon_type())
    .bind(&coupon.description)
    .bind(&coupon.discount_value)
    .bind(&coupon.url)
    .bind(coupon.starts_at)
    .bind(coupon.expires_at)
    .bind(coupon.is_active)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Soft-deletes every coupon whose `expires_at` has passed. Idempotent:
/// rows already inactive are not touched, so repeated sweeps are no-ops.
///
/// Returns the number of rows newly deactivated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn deactivate_expired(pool: &PgPool) -> Result<u64, DbError> {
    let result = sqlx::query(
        "UPDATE coupons SET is_active = FALSE, updated_at = NOW() \
         WHERE is_active AND expires_at IS NOT NULL AND expires_at < NOW()",
    )
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Counts the active coupons of one store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_active_by_store(pool: &PgPool, store_id: i64) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM coupons WHERE store_id = $1 AND is_active",
    )
    .bind(store_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Returns the non-empty discount strings of one store's active coupons,
/// in insertion order. Input to best-offer selection.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_discounts(pool: &PgPool, store_id: i64) -> Result<Vec<String>, DbError> {
    let rows: Vec<String> = sqlx::query_scalar::<_, String>(
        "SELECT discount_value FROM coupons \
         WHERE store_id = $1 AND is_active AND discount_value IS NOT NULL \
         ORDER BY id",
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
