use serde::{Deserialize, Serialize};

/// A coupon scraped from one page load of a competitor site, normalized for
/// hand-off to a caller (JSON output or database insert).
///
/// Records are immutable snapshots: a scrape session produces a batch of
/// them together with the page's merchant fields, and nothing mutates them
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponRecord {
    /// Display title of the promotion, e.g. `"20% Off Sitewide"`.
    ///
    /// Never empty: when no title could be extracted, a synthesized one is
    /// used (`"{merchant} Special Offer #N"`).
    pub promotion_title: String,
    /// Derived category bucket, e.g. `"Shipping"` or `"20% Off"`.
    pub subtitle: String,
    /// Normalized uppercase alphanumeric code, or `None` for plain deals.
    pub coupon_code: Option<String>,
    /// Free-text description; empty string when unknown.
    pub description: String,
    /// Expiry as presented by the page, free text; empty when unknown.
    pub expiry_date: String,
    /// URL of the page the record was scraped from.
    pub url: String,

    // Merchant fields, attached once per scrape session (one merchant per
    // page).
    pub merchant_name: String,
    pub merchant_domain: String,
    pub merchant_url: String,
    pub merchant_logo: String,
    pub merchant_description: String,
}

impl CouponRecord {
    /// Returns `"code"` when the record carries a coupon code, `"deal"`
    /// otherwise.
    #[must_use]
    pub fn offer_type(&self) -> &'static str {
        if self.coupon_code.is_some() {
            "code"
        } else {
            "deal"
        }
    }

    /// Returns `true` when the record carries enough signal to keep: a
    /// non-empty title or a code. Items failing this are discarded by the
    /// scraper before hand-off.
    #[must_use]
    pub fn is_substantial(&self) -> bool {
        !self.promotion_title.trim().is_empty() || self.coupon_code.is_some()
    }
}
