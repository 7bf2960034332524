//! Page scraping orchestration: merchant info, item discovery, per-item
//! extraction, and the sanity filter that drops items carrying no signal.

use dscout_core::CouponRecord;
use scraper::Html;

use crate::discover::discover_coupon_items;
use crate::fields::{
    derive_subtitle, extract_code, extract_raw_title, extract_text_field, synthesize_title,
};
use crate::merchant::extract_merchant_info;
use crate::sites::SiteConfig;

/// Scrapes one loaded page of a known site into a list of
/// [`CouponRecord`]s.
///
/// Items that yield neither a title nor a code nor a description are
/// discarded; everything else is kept, with a synthesized title when the
/// title cascade came up empty.
#[must_use]
pub fn scrape_page(html: &str, config: &SiteConfig, page_url: &str) -> Vec<CouponRecord> {
    let doc = Html::parse_document(html);
    scrape_document(&doc, config, page_url)
}

/// Same as [`scrape_page`], over an already-parsed document.
#[must_use]
pub fn scrape_document(doc: &Html, config: &SiteConfig, page_url: &str) -> Vec<CouponRecord> {
    let merchant = extract_merchant_info(doc, config, page_url);
    let (items, strategy) = discover_coupon_items(doc.root_element(), config);
    tracing::debug!(
        site = config.key,
        merchant = %merchant.name,
        items = items.len(),
        ?strategy,
        "scraping page"
    );

    let mut records = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        let code = extract_code(config.selectors.item_code.as_ref(), item);
        let raw_title = extract_raw_title(config.selectors.item_title.as_ref(), item);
        let description = extract_text_field(config.selectors.item_description.as_ref(), item);
        let expiry = extract_text_field(config.selectors.item_expiry.as_ref(), item);

        // No title, no code, no description: noise from a permissive
        // discovery strategy, not a coupon.
        if raw_title.is_empty() && code.is_none() && description.is_empty() {
            tracing::debug!(site = config.key, index, "discarding item with no signal");
            continue;
        }

        let promotion_title = if raw_title.is_empty() {
            synthesize_title(&merchant.name, index, code.as_deref())
        } else {
            raw_title
        };
        let subtitle = derive_subtitle(&promotion_title);

        records.push(CouponRecord {
            promotion_title,
            subtitle,
            coupon_code: code,
            description,
            expiry_date: expiry,
            url: page_url.to_owned(),
            merchant_name: merchant.name.clone(),
            merchant_domain: merchant.domain.clone(),
            merchant_url: merchant.url.clone(),
            merchant_logo: merchant.logo.clone(),
            merchant_description: merchant.description.clone(),
        });
    }

    records
}

#[cfg(test)]
#[path = "scrape_test.rs"]
mod tests;
