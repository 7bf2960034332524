//! Static site registry.
//!
//! One module per supported coupon site. Each contributes a [`SiteConfig`]
//! carrying its URL matchers, selector set, and a [`SiteRules`]
//! implementation holding the site-specific regex logic (merchant-name
//! extraction, name cleaning, redirect unwrapping). The registry is built
//! once and never mutated.

mod couponbirds;
mod tenereteam;
mod worthepenny;

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::selector::SelectorSpec;

/// Named selector specs for one site. `coupon_container` is a plain CSS
/// list (containers are tried in order, falling back to the document body);
/// everything else is a full [`SelectorSpec`].
#[derive(Debug, Clone, Default)]
pub struct SiteSelectors {
    pub merchant_container: Option<SelectorSpec>,
    pub merchant_link: Option<SelectorSpec>,
    pub merchant_logo: Option<SelectorSpec>,
    pub merchant_description: Option<SelectorSpec>,
    pub coupon_container: Vec<String>,
    pub coupon_items: Option<SelectorSpec>,
    pub item_title: Option<SelectorSpec>,
    pub item_description: Option<SelectorSpec>,
    pub item_code: Option<SelectorSpec>,
    pub item_expiry: Option<SelectorSpec>,
}

/// Site-specific behavioral overrides. Defaults cover the common cases so
/// a site only implements what differs.
pub trait SiteRules: Send + Sync {
    /// Ordered regex patterns for pulling a merchant name out of noisy
    /// link/page-title text; the first matching pattern's first capture
    /// group wins.
    fn merchant_name_patterns(&self) -> &'static [&'static str];

    /// Applies the pattern list to `text` and cleans the result.
    fn extract_merchant_name(&self, text: &str) -> Option<String> {
        let raw = first_capture(self.merchant_name_patterns(), text)?;
        let cleaned = self.clean_merchant_name(&raw);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }

    /// Strips trailing connector words and punctuation from a merchant
    /// name. Idempotent: cleaning a cleaned name is a no-op.
    fn clean_merchant_name(&self, name: &str) -> String {
        default_clean_merchant_name(name)
    }

    /// Unwraps a redirect/tracking URL to the true merchant URL. The
    /// default reads a `target=` or `url=` query parameter.
    fn extract_target_url(&self, url: &str) -> Option<String> {
        unwrap_redirect_param(url, &["target", "url"])
    }
}

/// Configuration for one supported site.
pub struct SiteConfig {
    pub key: &'static str,
    /// Substrings the page URL's host must contain (any).
    pub domain_matchers: &'static [&'static str],
    /// Substrings the page URL's path must contain (any); ANDed with the
    /// domain match.
    pub url_matchers: &'static [&'static str],
    pub selectors: SiteSelectors,
    pub rules: &'static dyn SiteRules,
}

impl std::fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteConfig")
            .field("key", &self.key)
            .field("domain_matchers", &self.domain_matchers)
            .field("url_matchers", &self.url_matchers)
            .finish_non_exhaustive()
    }
}

static REGISTRY: LazyLock<Vec<SiteConfig>> = LazyLock::new(|| {
    vec![
        worthepenny::config(),
        tenereteam::config(),
        couponbirds::config(),
    ]
});

/// All registered site configurations, in detection order.
#[must_use]
pub fn registry() -> &'static [SiteConfig] {
    &REGISTRY
}

/// Returns the first config whose domain AND path matchers both match the
/// given page URL.
#[must_use]
pub fn detect_site(url: &str) -> Option<&'static SiteConfig> {
    let (host, path) = split_host_path(url);
    registry().iter().find(|config| {
        config.domain_matchers.iter().any(|m| host.contains(m))
            && (config.url_matchers.is_empty()
                || config.url_matchers.iter().any(|m| path.contains(m)))
    })
}

/// Splits a URL into (host, path), tolerating missing schemes.
fn split_host_path(url: &str) -> (&str, &str) {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    match without_scheme.find('/') {
        Some(idx) => (&without_scheme[..idx], &without_scheme[idx..]),
        None => (without_scheme, ""),
    }
}

/// Applies an ordered regex pattern list; the first pattern whose first
/// capture group matches wins.
#[must_use]
pub fn first_capture(patterns: &[&str], text: &str) -> Option<String> {
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid regex");
        if let Some(cap) = re.captures(text) {
            if let Some(m) = cap.get(1) {
                let value = m.as_str().trim();
                if !value.is_empty() {
                    return Some(value.to_owned());
                }
            }
        }
    }
    None
}

/// Strips trailing connector words ("Coupon Codes", "Promo Code", …) and
/// dangling punctuation from a merchant name. Runs to a fixed point, which
/// makes it idempotent by construction.
#[must_use]
pub fn default_clean_merchant_name(name: &str) -> String {
    const TRAILING_WORDS: [&str; 8] = [
        "coupon codes",
        "coupon code",
        "promo codes",
        "promo code",
        "discount codes",
        "discount code",
        "coupons",
        "deals",
    ];

    let mut current = name.trim().to_owned();
    loop {
        let mut next = current.trim().to_owned();

        // Byte offsets below assume lowercasing preserved lengths.
        let lower = next.to_lowercase();
        if lower.len() == next.len() {
            for word in TRAILING_WORDS {
                if lower.ends_with(word) {
                    next.truncate(next.len() - word.len());
                    break;
                }
            }
        }

        let next = next
            .trim_end_matches(['&', '-', '|', ':', ',', '.', ' ', '\t'])
            .to_owned();

        if next == current {
            return current;
        }
        current = next;
    }
}

/// Reads the first of `params` present in the URL's query string and
/// percent-decodes it. Returns the decoded value only when it looks like an
/// absolute URL.
#[must_use]
pub fn unwrap_redirect_param(url: &str, params: &[&str]) -> Option<String> {
    let query_start = url.find('?')? + 1;
    let query = &url[query_start..];

    for param in params {
        let needle = format!("{param}=");
        for pair in query.split('&') {
            if let Some(value) = pair.strip_prefix(needle.as_str()) {
                let value = value.split('#').next().unwrap_or(value);
                let decoded = percent_decode_str(value).decode_utf8().ok()?;
                if decoded.starts_with("http://") || decoded.starts_with("https://") {
                    return Some(decoded.into_owned());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // detect_site
    // -----------------------------------------------------------------------

    #[test]
    fn detects_worthepenny_store_page() {
        let config = detect_site("https://www.worthepenny.com/coupon/acme").unwrap();
        assert_eq!(config.key, "worthepenny");
    }

    #[test]
    fn detects_tenereteam_store_page() {
        let config = detect_site("https://www.tenereteam.com/acme-coupons").unwrap();
        assert_eq!(config.key, "tenereteam");
    }

    #[test]
    fn detects_couponbirds_codes_page() {
        let config = detect_site("https://www.couponbirds.com/codes/acme.com").unwrap();
        assert_eq!(config.key, "couponbirds");
    }

    #[test]
    fn domain_match_alone_is_not_enough() {
        // worthepenny domain but a path that matches no URL pattern.
        assert!(detect_site("https://www.worthepenny.com/about-us").is_none());
    }

    #[test]
    fn unknown_domain_is_none() {
        assert!(detect_site("https://example.com/coupon/acme").is_none());
    }

    #[test]
    fn host_and_path_split_tolerates_missing_scheme() {
        let (host, path) = split_host_path("worthepenny.com/coupon/acme");
        assert_eq!(host, "worthepenny.com");
        assert_eq!(path, "/coupon/acme");
    }

    // -----------------------------------------------------------------------
    // default_clean_merchant_name
    // -----------------------------------------------------------------------

    #[test]
    fn clean_strips_trailing_connector_words() {
        assert_eq!(default_clean_merchant_name("Acme Coupon Codes"), "Acme");
        assert_eq!(default_clean_merchant_name("Acme Promo Code"), "Acme");
        assert_eq!(default_clean_merchant_name("Acme Coupons & "), "Acme");
    }

    #[test]
    fn clean_strips_stacked_noise() {
        // Multiple layers strip in successive passes of the fixed point.
        assert_eq!(
            default_clean_merchant_name("Acme Coupon Codes & Deals"),
            "Acme"
        );
    }

    #[test]
    fn clean_is_idempotent() {
        let samples = [
            "Acme Coupon Codes & Deals",
            "Blue Apron Promo Code -",
            "Suno Ai",
            "Dr. Squatch Coupons",
        ];
        for sample in samples {
            let once = default_clean_merchant_name(sample);
            let twice = default_clean_merchant_name(&once);
            assert_eq!(once, twice, "cleaning must be idempotent for {sample:?}");
        }
    }

    #[test]
    fn clean_preserves_inner_words() {
        assert_eq!(
            default_clean_merchant_name("The Coupon Shop"),
            "The Coupon Shop"
        );
    }

    // -----------------------------------------------------------------------
    // unwrap_redirect_param
    // -----------------------------------------------------------------------

    #[test]
    fn unwraps_percent_encoded_target() {
        assert_eq!(
            unwrap_redirect_param(
                "https://x.com/go?target=https%3A%2F%2Fmerchant.com",
                &["target", "url"]
            )
            .as_deref(),
            Some("https://merchant.com")
        );
    }

    #[test]
    fn unwraps_second_parameter_name() {
        assert_eq!(
            unwrap_redirect_param("https://x.com/out?url=https://shop.example", &["target", "url"])
                .as_deref(),
            Some("https://shop.example")
        );
    }

    #[test]
    fn rejects_non_url_values() {
        assert!(unwrap_redirect_param("https://x.com/go?target=12345", &["target"]).is_none());
    }

    #[test]
    fn no_query_string_is_none() {
        assert!(unwrap_redirect_param("https://x.com/go", &["target"]).is_none());
    }

    // -----------------------------------------------------------------------
    // first_capture
    // -----------------------------------------------------------------------

    #[test]
    fn first_matching_pattern_wins() {
        let patterns = [r"^(.*?)\s+Coupons?\b", r"^(.*?)\s*[-|]"];
        assert_eq!(
            first_capture(&patterns, "Acme Coupons - 30% Off").as_deref(),
            Some("Acme")
        );
    }

    #[test]
    fn later_pattern_used_when_earlier_fails() {
        let patterns = [r"^(.*?)\s+Coupons?\b", r"^(.*?)\s*[-|]"];
        assert_eq!(
            first_capture(&patterns, "Acme - Deals Today").as_deref(),
            Some("Acme")
        );
    }

    #[test]
    fn no_pattern_matching_is_none() {
        assert!(first_capture(&[r"^(.*?)\s+Coupons\b"], "plain text").is_none());
    }
}
