//! WorthEPenny store pages.
//!
//! Page titles look like `"80% Off Acme Coupon Code & Promo Codes - Feb 2026"`
//! or `"Acme Coupon Codes & Deals"`. Outbound offer links wrap the merchant
//! URL in a `target=` query parameter.

use super::{SiteConfig, SiteRules, SiteSelectors};
use crate::selector::SelectorSpec;

struct WorthepennyRules;

impl SiteRules for WorthepennyRules {
    fn merchant_name_patterns(&self) -> &'static [&'static str] {
        &[
            // "80% Off Acme Coupon Code ..." — skip the leading discount.
            r"^\d+%\s+Off\s+(.+?)\s+(?:Coupon|Promo|Discount)",
            r"^(.+?)\s+(?:Coupon|Promo|Discount)",
            r"^(.+?)\s+Deals\b",
            r"^(.+?)\s*[-|–]",
        ]
    }
}

static RULES: WorthepennyRules = WorthepennyRules;

pub(super) fn config() -> SiteConfig {
    SiteConfig {
        key: "worthepenny",
        domain_matchers: &["worthepenny.com"],
        url_matchers: &["/coupon", "/store"],
        selectors: SiteSelectors {
            merchant_container: Some(SelectorSpec::css_list(&[
                ".store-info",
                ".merchant-head",
            ])),
            merchant_link: Some(SelectorSpec::css_list(&[
                ".store-info a.store-link",
                ".merchant-head a",
                "h1 a",
            ])),
            merchant_logo: Some(SelectorSpec::css_list(&[
                ".store-info img.logo",
                ".merchant-head img",
            ])),
            merchant_description: Some(SelectorSpec::css(".store-description")),
            coupon_container: vec![
                ".coupon-list".to_owned(),
                "#coupon-area".to_owned(),
                ".main-content".to_owned(),
            ],
            coupon_items: Some(SelectorSpec::xpath(
                "//div[contains(@class,'coupon-item')]",
                &[".coupon-item", ".offer-card", "li.coupon"],
            )),
            item_title: Some(SelectorSpec::css_list(&[".coupon-title", "h3", "h4"])),
            item_description: Some(SelectorSpec::css_list(&[
                ".coupon-description",
                ".detail",
            ])),
            item_code: Some(SelectorSpec::css_list(&[
                ".coupon-code",
                ".code",
                "[data-code]",
            ])),
            item_expiry: Some(SelectorSpec::css_list(&[".expiry", ".valid-until"])),
        },
        rules: &RULES,
    }
}
