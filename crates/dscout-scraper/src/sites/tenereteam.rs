//! TenereTeam store pages.
//!
//! Page titles look like `"Acme Coupons: 30% Off Promo Codes (Feb 2026)"`.
//! Outbound links go through `/redirect?go=<encoded url>`.

use super::{unwrap_redirect_param, SiteConfig, SiteRules, SiteSelectors};
use crate::selector::SelectorSpec;

struct TenereteamRules;

impl SiteRules for TenereteamRules {
    fn merchant_name_patterns(&self) -> &'static [&'static str] {
        &[
            r"^(.+?)\s+Coupons?\b",
            r"^(.+?)\s+(?:Promo|Discount)\b",
            r"^(.+?)\s*[:|]",
        ]
    }

    fn extract_target_url(&self, url: &str) -> Option<String> {
        unwrap_redirect_param(url, &["go", "target", "url"])
    }
}

static RULES: TenereteamRules = TenereteamRules;

pub(super) fn config() -> SiteConfig {
    SiteConfig {
        key: "tenereteam",
        domain_matchers: &["tenereteam.com"],
        url_matchers: &["-coupons", "/store", "/coupons"],
        selectors: SiteSelectors {
            merchant_container: Some(SelectorSpec::css_list(&[
                ".store-header",
                ".shop-intro",
            ])),
            merchant_link: Some(SelectorSpec::css_list(&[
                ".store-header a.website",
                ".shop-intro a",
            ])),
            merchant_logo: Some(SelectorSpec::css_list(&[
                ".store-header img",
                "img.store-logo",
            ])),
            merchant_description: Some(SelectorSpec::css_list(&[
                ".store-about",
                ".shop-intro p",
            ])),
            coupon_container: vec![".coupons-listing".to_owned(), "#offers".to_owned()],
            coupon_items: Some(SelectorSpec::xpath(
                "//div[contains(@class,'coupon-detail')]",
                &[".coupon-detail", ".deal-block"],
            )),
            item_title: Some(SelectorSpec::css_list(&[".coupon-title", "h3.title"])),
            item_description: Some(SelectorSpec::css(".coupon-des")),
            item_code: Some(SelectorSpec::css_list(&["span.code-text", "[data-code]"])),
            item_expiry: Some(SelectorSpec::css(".expire-time")),
        },
        rules: &RULES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_name_before_coupons_keyword() {
        let name = RULES
            .extract_merchant_name("Acme Coupons: 30% Off Promo Codes (Feb 2026)")
            .unwrap();
        assert_eq!(name, "Acme");
    }

    #[test]
    fn merchant_name_before_colon() {
        let name = RULES
            .extract_merchant_name("Suno Ai: Best Deals Today")
            .unwrap();
        assert_eq!(name, "Suno Ai");
    }

    #[test]
    fn target_url_from_go_parameter() {
        let url = RULES
            .extract_target_url(
                "https://www.tenereteam.com/redirect?go=https%3A%2F%2Fshop.acme.com%2Fsale",
            )
            .unwrap();
        assert_eq!(url, "https://shop.acme.com/sale");
    }
}
