//! Normalization from raw affiliate API records to the persisted
//! [`NormalizedStore`] / [`NormalizedCoupon`] shapes.
//!
//! Records missing their identifier or name/title are rejected with a
//! [`AffiliateError::Normalization`] error; the sync loop skips and counts
//! them rather than halting the batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dscout_core::{NormalizedCoupon, NormalizedStore};

use crate::error::AffiliateError;
use crate::types::{id_to_string, RawMerchant, RawOffer};

/// Normalizes a raw merchant into a [`NormalizedStore`].
///
/// # Errors
///
/// Returns [`AffiliateError::Normalization`] when the record has no id or
/// no name.
pub fn normalize_merchant(raw: &RawMerchant) -> Result<NormalizedStore, AffiliateError> {
    let external_id = id_to_string(raw.id.as_ref()).ok_or_else(|| AffiliateError::Normalization {
        external_id: "<missing>".to_owned(),
        reason: "merchant has no Id".to_owned(),
    })?;

    let name = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AffiliateError::Normalization {
            external_id: external_id.clone(),
            reason: "merchant has no Name".to_owned(),
        })?
        .to_owned();

    let alias = slugify(&name);
    let website = raw
        .site_url
        .as_deref()
        .map(bare_domain)
        .filter(|d| !d.is_empty());

    Ok(NormalizedStore {
        external_id,
        alias,
        name,
        logo_url: non_empty(raw.logo.as_deref()),
        website,
        url: non_empty(raw.url.as_deref()),
        description: non_empty(raw.description.as_deref()),
        domains_data: raw.domains.clone(),
        countries_data: raw.countries.clone(),
        commission_data: raw.commission.clone(),
    })
}

/// Normalizes a raw offer into a [`NormalizedCoupon`].
///
/// `is_active` is derived from the start/end window against `now`; the
/// expiration sweep re-derives it on every sync.
///
/// # Errors
///
/// Returns [`AffiliateError::Normalization`] when the record has no id,
/// no owning merchant id, or no title.
pub fn normalize_offer(
    raw: &RawOffer,
    now: DateTime<Utc>,
) -> Result<NormalizedCoupon, AffiliateError> {
    let external_id = id_to_string(raw.id.as_ref()).ok_or_else(|| AffiliateError::Normalization {
        external_id: "<missing>".to_owned(),
        reason: "offer has no Id".to_owned(),
    })?;

    let store_external_id =
        id_to_string(raw.merchant_id.as_ref()).ok_or_else(|| AffiliateError::Normalization {
            external_id: external_id.clone(),
            reason: "offer has no MerchantId".to_owned(),
        })?;

    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AffiliateError::Normalization {
            external_id: external_id.clone(),
            reason: "offer has no Title".to_owned(),
        })?
        .to_owned();

    let starts_at = raw.start_date.as_deref().and_then(parse_api_date);
    let expires_at = raw.end_date.as_deref().and_then(parse_api_date);

    let started = starts_at.is_none_or(|s| s <= now);
    let not_expired = expires_at.is_none_or(|e| e > now);

    Ok(NormalizedCoupon {
        external_id,
        store_external_id,
        title,
        code: non_empty(raw.code.as_deref()),
        description: non_empty(raw.description.as_deref()),
        discount_value: non_empty(raw.discount.as_deref()),
        url: non_empty(raw.url.as_deref()),
        starts_at,
        expires_at,
        is_active: started && not_expired,
    })
}

/// Derives a URL slug from a store name: lowercase, alphanumeric runs
/// joined by single dashes. `"Dr. Squatch"` → `"dr-squatch"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }

    slug.trim_end_matches('-').to_owned()
}

/// Parses the network's date formats: `"YYYY-MM-DD HH:MM:SS"`,
/// `"YYYY-MM-DD"`, or RFC 3339. Empty strings and unparseable values are
/// `None` ("no bound").
#[must_use]
pub fn parse_api_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Reduces a URL to its bare domain (no scheme, no `www.`, no path).
fn bare_domain(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = without_scheme.split(['/', '?', '#']).next().unwrap_or("");
    host.strip_prefix("www.").unwrap_or(host).to_owned()
}
