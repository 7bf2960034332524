//! `dscout sync` — the batch pipeline against the affiliate network.
//!
//! Sequential by design: pages, stores, and coupons are processed one at a
//! time with fixed inter-request delays. A malformed record is skipped and
//! counted, never fatal; only top-level failures (no database, aborted
//! page walk) end the run with a non-zero exit.

use std::collections::HashMap;

use anyhow::Context;
use chrono::Utc;
use dscout_affiliate::{
    best_offer, compute_popularity, derive_rating, is_featured, normalize_merchant,
    normalize_offer, AffiliateClient,
};
use dscout_core::AppConfig;
use dscout_db::PoolConfig;
use sqlx::PgPool;

/// Counters for one phase of the batch, printed in the end-of-run summary.
#[derive(Debug, Default)]
struct PhaseTotals {
    processed: usize,
    success: usize,
    failed: usize,
}

impl PhaseTotals {
    fn print(&self, phase: &str) {
        println!(
            "{phase}: processed {}, success {}, failed {}",
            self.processed, self.success, self.failed
        );
    }
}

/// Runs the full sync: merchants, offers, expiration sweep, derived stats.
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let key = config.require_affiliate_key()?;

    let client = AffiliateClient::new(
        &config.affiliate_api_base,
        &config.affiliate_user,
        key,
        config.affiliate_page_size,
        config.scraper_request_timeout_secs,
    )?;

    let store_totals = sync_stores(&pool, &client, config).await?;
    let coupon_totals = sync_coupons(&pool, &client, config).await?;

    let swept = dscout_db::deactivate_expired(&pool)
        .await
        .context("expiration sweep failed")?;

    let stats_updated = refresh_store_stats(&pool).await?;

    store_totals.print("stores");
    coupon_totals.print("coupons");
    println!("expired coupons deactivated: {swept}");
    println!("store stats refreshed: {stats_updated}");

    Ok(())
}

/// Runs only the expiration sweep.
pub async fn sweep(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let swept = dscout_db::deactivate_expired(&pool).await?;
    println!("expired coupons deactivated: {swept}");
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let database_url = config.require_database_url()?;
    let pool = dscout_db::connect_pool(database_url, PoolConfig::from_app_config(config))
        .await
        .context("database connection failed")?;
    dscout_db::run_migrations(&pool)
        .await
        .context("migrations failed")?;
    Ok(pool)
}

async fn sync_stores(
    pool: &PgPool,
    client: &AffiliateClient,
    config: &AppConfig,
) -> anyhow::Result<PhaseTotals> {
    let raw_merchants = client
        .fetch_all_merchants(config.sync_inter_request_delay_ms)
        .await
        .context("merchant fetch aborted")?;

    let mut totals = PhaseTotals::default();
    for raw in &raw_merchants {
        totals.processed += 1;
        let store = match normalize_merchant(raw) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed merchant record");
                totals.failed += 1;
                continue;
            }
        };
        match dscout_db::upsert_store(pool, &store).await {
            Ok(_) => totals.success += 1,
            Err(err) => {
                tracing::warn!(external_id = %store.external_id, error = %err, "store upsert failed");
                totals.failed += 1;
            }
        }
    }

    Ok(totals)
}

async fn sync_coupons(
    pool: &PgPool,
    client: &AffiliateClient,
    config: &AppConfig,
) -> anyhow::Result<PhaseTotals> {
    let raw_offers = client
        .fetch_all_coupons(config.sync_inter_request_delay_ms)
        .await
        .context("coupon fetch aborted")?;

    let now = Utc::now();
    let mut totals = PhaseTotals::default();
    // Store ids resolve repeatedly to the same handful of merchants;
    // memoize the lookups across the batch.
    let mut store_ids: HashMap<String, Option<i64>> = HashMap::new();

    for raw in &raw_offers {
        totals.processed += 1;
        let coupon = match normalize_offer(raw, now) {
            Ok(coupon) => coupon,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed offer record");
                totals.failed += 1;
                continue;
            }
        };

        let store_id = match store_ids.get(&coupon.store_external_id) {
            Some(cached) => *cached,
            None => {
                let fetched = dscout_db::get_store_by_external_id(pool, &coupon.store_external_id)
                    .await?
                    .map(|row| row.id);
                store_ids.insert(coupon.store_external_id.clone(), fetched);
                fetched
            }
        };

        let Some(store_id) = store_id else {
            tracing::warn!(
                offer = %coupon.external_id,
                store = %coupon.store_external_id,
                "skipping offer for unknown store"
            );
            totals.failed += 1;
            continue;
        };

        match dscout_db::upsert_coupon(pool, store_id, &coupon).await {
            Ok(_) => totals.success += 1,
            Err(err) => {
                tracing::warn!(external_id = %coupon.external_id, error = %err, "coupon upsert failed");
                totals.failed += 1;
            }
        }
    }

    Ok(totals)
}

/// Recomputes per-store derived stats from freshly counted offers. Runs
/// after the sweep so counts never include just-expired coupons.
async fn refresh_store_stats(pool: &PgPool) -> anyhow::Result<usize> {
    let stores = dscout_db::list_stores(pool).await?;
    let mut updated = 0usize;

    for store in &stores {
        let active = dscout_db::count_active_by_store(pool, store.id).await?;
        let discounts = dscout_db::list_active_discounts(pool, store.id).await?;
        let best = best_offer(&discounts);

        let popularity = compute_popularity(
            store.logo_url.is_some(),
            store.description.is_some(),
            store.website.is_some(),
            active,
        );
        let featured = is_featured(popularity);
        let (rating, review_count) = derive_rating(&store.external_id, active);

        let result = dscout_db::update_store_stats(
            pool,
            store.id,
            i32::try_from(active).unwrap_or(i32::MAX),
            i32::from(popularity),
            featured,
            rating,
            review_count,
            best,
        )
        .await;

        match result {
            Ok(()) => updated += 1,
            Err(err) => {
                tracing::warn!(store = %store.alias, error = %err, "stats update failed");
            }
        }
    }

    Ok(updated)
}
