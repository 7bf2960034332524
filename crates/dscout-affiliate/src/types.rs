//! Affiliate network API response types.
//!
//! ## Observed envelope shape
//!
//! Every endpoint wraps its payload in the same envelope:
//!
//! ```text
//! { "response": { "PageTotal": 7, ... }, "data": [ ... ] }
//! ```
//!
//! `data` may be absent entirely on an empty page; `#[serde(default)]`
//! covers that case. Field names on records are PascalCase.
//!
//! ## Dates
//!
//! `StartDate`/`EndDate` arrive as `"YYYY-MM-DD"` or
//! `"YYYY-MM-DD HH:MM:SS"`, occasionally as an empty string meaning
//! "no bound". Parsing is best-effort in `normalize.rs`.
//!
//! ## Opaque blobs
//!
//! `Domains`, `Countries`, and `Commission` vary by network program and are
//! passed through as raw JSON; the database stores them untouched.

use serde::Deserialize;

/// The common response envelope for every `act=` endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub response: PageMeta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Pagination metadata from the envelope.
#[derive(Debug, Deserialize)]
pub struct PageMeta {
    /// Total number of pages for the current query.
    #[serde(rename = "PageTotal", default)]
    pub page_total: u32,
}

/// A raw merchant record from `act=merchants`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMerchant {
    /// Network-wide merchant identifier; the upsert key. Numeric upstream
    /// but modeled as a string to avoid precision assumptions.
    #[serde(rename = "Id", default)]
    pub id: Option<serde_json::Value>,

    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    /// CDN URL of the merchant logo; may be an empty string.
    #[serde(rename = "Logo", default)]
    pub logo: Option<String>,

    /// Affiliate tracking URL for outbound clicks.
    #[serde(rename = "Url", default)]
    pub url: Option<String>,

    /// The merchant's own site URL.
    #[serde(rename = "SiteUrl", default)]
    pub site_url: Option<String>,

    #[serde(rename = "Description", default)]
    pub description: Option<String>,

    /// Opaque program data, passed through to storage unmodified.
    #[serde(rename = "Domains", default)]
    pub domains: serde_json::Value,

    #[serde(rename = "Countries", default)]
    pub countries: serde_json::Value,

    #[serde(rename = "Commission", default)]
    pub commission: serde_json::Value,
}

/// A raw offer record from `act=coupons`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOffer {
    /// Network-wide offer identifier; the upsert key.
    #[serde(rename = "Id", default)]
    pub id: Option<serde_json::Value>,

    /// Identifier of the owning merchant.
    #[serde(rename = "MerchantId", default)]
    pub merchant_id: Option<serde_json::Value>,

    #[serde(rename = "Title", default)]
    pub title: Option<String>,

    /// Coupon code; empty string and `null` both mean "plain deal".
    #[serde(rename = "Code", default)]
    pub code: Option<String>,

    #[serde(rename = "Description", default)]
    pub description: Option<String>,

    /// Free-text discount string, e.g. `"Save 25% Off orders"`.
    #[serde(rename = "Discount", default)]
    pub discount: Option<String>,

    #[serde(rename = "Url", default)]
    pub url: Option<String>,

    #[serde(rename = "StartDate", default)]
    pub start_date: Option<String>,

    #[serde(rename = "EndDate", default)]
    pub end_date: Option<String>,
}

/// Renders an upstream `Id` value (number or string) as a stable string
/// key, or `None` when absent/empty.
#[must_use]
pub fn id_to_string(id: Option<&serde_json::Value>) -> Option<String> {
    match id? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_parses_with_data() {
        let body = r#"{"response": {"PageTotal": 3}, "data": [{"Id": 7, "Name": "Acme"}]}"#;
        let envelope: ApiEnvelope<RawMerchant> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.response.page_total, 3);
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].name.as_deref(), Some("Acme"));
    }

    #[test]
    fn envelope_parses_with_missing_data_field() {
        let body = r#"{"response": {"PageTotal": 0}}"#;
        let envelope: ApiEnvelope<RawMerchant> = serde_json::from_str(body).unwrap();
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn numeric_and_string_ids_both_stringify() {
        assert_eq!(
            id_to_string(Some(&serde_json::json!(12345))).as_deref(),
            Some("12345")
        );
        assert_eq!(
            id_to_string(Some(&serde_json::json!("mch-9"))).as_deref(),
            Some("mch-9")
        );
    }

    #[test]
    fn empty_and_missing_ids_are_none() {
        assert!(id_to_string(Some(&serde_json::json!(""))).is_none());
        assert!(id_to_string(Some(&serde_json::Value::Null)).is_none());
        assert!(id_to_string(None).is_none());
    }
}
