use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A merchant record mapped from the affiliate network, ready for
/// database persistence.
///
/// `external_id` is the network's identifier and the upsert key: repeated
/// syncs with the same id update the same row in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedStore {
    pub external_id: String,
    pub name: String,
    /// URL slug derived from `name`, e.g. `"Dr. Squatch"` → `"dr-squatch"`.
    pub alias: String,
    pub logo_url: Option<String>,
    /// Bare merchant domain (no scheme, no `www.`), e.g. `"acme.com"`.
    pub website: Option<String>,
    /// Affiliate tracking URL for outbound clicks.
    pub url: Option<String>,
    pub description: Option<String>,
    /// Opaque upstream blobs, passed through unmodified.
    pub domains_data: serde_json::Value,
    pub countries_data: serde_json::Value,
    pub commission_data: serde_json::Value,
}

/// An offer record mapped from the affiliate network.
///
/// `code` presence determines the offer type (`"code"` vs `"deal"`);
/// `is_active` is derived from the start/end date window at mapping time
/// and re-derived by the expiration sweep on every sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedCoupon {
    pub external_id: String,
    /// External id of the owning store; resolved to the internal store id
    /// at upsert time.
    pub store_external_id: String,
    pub title: String,
    pub code: Option<String>,
    pub description: Option<String>,
    /// Free-text discount string as provided upstream, e.g.
    /// `"Save 25% Off orders"`. Parsed on demand by the discount parser.
    pub discount_value: Option<String>,
    pub url: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl NormalizedCoupon {
    /// Returns `"code"` when the offer carries a coupon code, `"deal"`
    /// otherwise.
    #[must_use]
    pub fn coupon_type(&self) -> &'static str {
        if self.code.is_some() {
            "code"
        } else {
            "deal"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_type_follows_code_presence() {
        let mut coupon = NormalizedCoupon {
            external_id: "ofr-1".to_string(),
            store_external_id: "mch-1".to_string(),
            title: "20% Off".to_string(),
            code: Some("SAVE20".to_string()),
            description: None,
            discount_value: Some("20% off".to_string()),
            url: None,
            starts_at: None,
            expires_at: None,
            is_active: true,
        };
        assert_eq!(coupon.coupon_type(), "code");

        coupon.code = None;
        assert_eq!(coupon.coupon_type(), "deal");
    }
}
