//! Database operations for the `stores` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub public_id: Uuid,
    pub external_id: String,
    pub name: String,
    pub alias: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub domains_data: serde_json::Value,
    pub countries_data: serde_json::Value,
    pub commission_data: serde_json::Value,
    pub active_offers_count: i32,
    pub popularity: i32,
    pub is_featured: bool,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub best_offer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const STORE_COLUMNS: &str = "id, public_id, external_id, name, alias, logo_url, website, url, \
     description, domains_data, countries_data, commission_data, active_offers_count, \
     popularity, is_featured, rating, review_count, best_offer, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Upserts a store row keyed by `external_id`.
///
/// Conflicts update the descriptive columns in place and refresh
/// `updated_at`; derived columns (counts, popularity, rating) are left for
/// [`update_store_stats`] to maintain after coupon counts are refreshed.
///
/// Returns the internal `id` of the upserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_store(
    pool: &PgPool,
    store: &dscout_core::NormalizedStore,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO stores \
             (external_id, name, alias, logo_url, website, url, description, \
              domains_data, countries_data, commission_data) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, \
                 $8::jsonb, $9::jsonb, $10::jsonb) \
         ON CONFLICT (external_id) DO UPDATE SET \
             name            = EXCLUDED.name, \
             alias           = EXCLUDED.alias, \
             logo_url        = EXCLUDED.logo_url, \
             website         = EXCLUDED.website, \
             url             = EXCLUDED.url, \
             description     = EXCLUDED.description, \
             domains_data    = EXCLUDED.domains_data, \
             countries_data  = EXCLUDED.countries_data, \
             commission_data = EXCLUDED.commission_data, \
             updated_at      = NOW() \
         RETURNING id",
    )
    .bind(&store.external_id)
    .bind(&store.name)
    .bind(&store.alias)
    .bind(&store.logo_url)
    .bind(&store.website)
    .bind(&store.url)
    .bind(&store.description)
    .bind(&store.domains_data)
    .bind(&store.countries_data)
    .bind(&store.commission_data)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Returns a store by its affiliate-network external id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_store_by_external_id(
    pool: &PgPool,
    external_id: &str,
) -> Result<Option<StoreRow>, DbError> {
    let row = sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores WHERE external_id = $1"
    ))
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns all stores, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_stores(pool: &PgPool) -> Result<Vec<StoreRow>, DbError> {
    let rows =
        sqlx::query_as::<_, StoreRow>(&format!("SELECT {STORE_COLUMNS} FROM stores ORDER BY name"))
            .fetch_all(pool)
            .await?;

    Ok(rows)
}

/// Writes the derived statistics for one store. Called once per store at
/// the end of every sync run, always from freshly counted offers.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
#[allow(clippy::too_many_arguments)] // mirrors the derived-column set; no sensible grouping
pub async fn update_store_stats(
    pool: &PgPool,
    store_id: i64,
    active_offers_count: i32,
    popularity: i32,
    is_featured: bool,
    rating: f64,
    review_count: i32,
    best_offer: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE stores SET \
             active_offers_count = $1, \
             popularity          = $2, \
             is_featured         = $3, \
             rating              = $4, \
             review_count        = $5, \
             best_offer          = $6, \
             updated_at          = NOW() \
         WHERE id = $7",
    )
    .bind(active_offers_count)
    .bind(popularity)
    .bind(is_featured)
    .bind(rating)
    .bind(review_count)
    .bind(best_offer)
    .bind(store_id)
    .execute(pool)
    .await?;
    Ok(())
}
