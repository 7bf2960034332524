//! CouponBirds merchant pages (`/codes/<domain>`).
//!
//! Page titles look like `"35% Off Acme Promo Codes | Verified Feb 2026"`.

use super::{SiteConfig, SiteRules, SiteSelectors};
use crate::selector::SelectorSpec;

struct CouponbirdsRules;

impl SiteRules for CouponbirdsRules {
    fn merchant_name_patterns(&self) -> &'static [&'static str] {
        &[
            r"^\d+%\s+Off\s+(.+?)\s+(?:Coupon|Promo)",
            r"^(.+?)\s+(?:Coupon|Promo)\b",
            r"^(.+?)\s*\|",
        ]
    }
}

static RULES: CouponbirdsRules = CouponbirdsRules;

pub(super) fn config() -> SiteConfig {
    SiteConfig {
        key: "couponbirds",
        domain_matchers: &["couponbirds.com"],
        url_matchers: &["/codes"],
        selectors: SiteSelectors {
            merchant_container: Some(SelectorSpec::css(".shop-head")),
            merchant_link: Some(SelectorSpec::css_list(&[
                ".shop-head a.shop-site",
                ".breadcrumb a:last-child",
            ])),
            merchant_logo: Some(SelectorSpec::css(".shop-head img")),
            merchant_description: Some(SelectorSpec::css(".shop-summary")),
            coupon_container: vec![".promotion-list".to_owned(), "#AllCoupons".to_owned()],
            coupon_items: Some(SelectorSpec::css_list(&[
                ".promotion-item",
                ".coupon-item",
            ])),
            item_title: Some(SelectorSpec::css_list(&[".promotion-title", "h3"])),
            item_description: Some(SelectorSpec::css(".promotion-detail")),
            item_code: Some(SelectorSpec::css_list(&[
                ".code-btn",
                "[data-code]",
                "[data-coupon]",
            ])),
            item_expiry: Some(SelectorSpec::css(".expire")),
        },
        rules: &RULES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_name_from_discount_prefixed_title() {
        let name = RULES
            .extract_merchant_name("35% Off Acme Promo Codes | Verified Feb 2026")
            .unwrap();
        assert_eq!(name, "Acme");
    }

    #[test]
    fn merchant_name_from_pipe_separated_title() {
        let name = RULES
            .extract_merchant_name("Acme Outlet | Official Deals")
            .unwrap();
        assert_eq!(name, "Acme Outlet");
    }

    #[test]
    fn default_target_unwrap_applies() {
        let url = RULES
            .extract_target_url("https://www.couponbirds.com/out?url=https%3A%2F%2Facme.com")
            .unwrap();
        assert_eq!(url, "https://acme.com");
    }
}
