use scraper::Html;

use super::{discover_coupon_items, Strategy};
use crate::sites::{detect_site, SiteConfig};

fn worthepenny() -> &'static SiteConfig {
    detect_site("https://www.worthepenny.com/coupon/acme").expect("config present")
}

// ---------------------------------------------------------------------------
// Strategy 1: configured selectors
// ---------------------------------------------------------------------------

#[test]
fn configured_selectors_inside_configured_container() {
    let doc = Html::parse_document(
        r#"<body><div class="coupon-list">
             <div class="coupon-item">20% off everything with code SAVE20</div>
             <div class="coupon-item">Free shipping deal on all orders</div>
           </div></body>"#,
    );
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert_eq!(strategy, Some(Strategy::ConfiguredSelectors));
    assert_eq!(items.len(), 2);
}

#[test]
fn container_defaults_to_document_when_absent() {
    let doc = Html::parse_document(
        r#"<body><main>
             <div class="coupon-item">20% off everything with code SAVE20</div>
           </main></body>"#,
    );
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert_eq!(strategy, Some(Strategy::ConfiguredSelectors));
    assert_eq!(items.len(), 1);
}

// ---------------------------------------------------------------------------
// Strategy 2: configured XPath
// ---------------------------------------------------------------------------

#[test]
fn configured_xpath_when_css_item_selectors_fail() {
    // "coupon-item-row" defeats the `.coupon-item` class selector but
    // matches the substring-based configured XPath.
    let doc = Html::parse_document(
        r#"<body><div class="coupon-list">
             <div class="coupon-item-row">20% off everything with code SAVE20</div>
           </div></body>"#,
    );
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert_eq!(strategy, Some(Strategy::ConfiguredXPath));
    assert_eq!(items.len(), 1);
}

// ---------------------------------------------------------------------------
// Strategy 3: generic class heuristics
// ---------------------------------------------------------------------------

#[test]
fn class_substring_heuristic_matches_when_config_fails() {
    let doc = Html::parse_document(
        r#"<body>
             <section class="promo-block">Save 30% on your first order today</section>
           </body>"#,
    );
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert_eq!(strategy, Some(Strategy::ClassHeuristics));
    assert_eq!(items.len(), 1);
}

#[test]
fn opaque_class_names_caught_by_any_classed_block_probe() {
    // The end-to-end resilience case: unknown container, unknown item
    // classes, three opaque blocks carrying discount text.
    let doc = Html::parse_document(
        r#"<body><div>
             <div class="gcbr">SAVE20 — 20% off storewide</div>
             <div class="gcbr">FREESHIP — free shipping deal</div>
             <div class="gcbr">TEN4U — $10 off any order</div>
           </div></body>"#,
    );
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert_eq!(strategy, Some(Strategy::ClassHeuristics));
    assert_eq!(items.len(), 3);
}

#[test]
fn class_heuristic_filters_by_text_length_and_vocabulary() {
    let doc = Html::parse_document(
        r#"<body>
             <div class="coupon">hi</div>
             <div class="deal-banner">lorem ipsum dolor sit amet nothing relevant here at all</div>
           </body>"#,
    );
    // "hi" fails the length filter; the banner has length but no signal
    // word... except "deal" never appears in its text either. Both are
    // rejected, and no later strategy finds anything of substance.
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert!(items.is_empty(), "expected no items, got {}", items.len());
    assert_eq!(strategy, None);
}

// ---------------------------------------------------------------------------
// Strategy 4: text-anchored search
// ---------------------------------------------------------------------------

#[test]
fn text_search_finds_unclassed_elements() {
    let doc = Html::parse_document(
        r#"<body><table><tr><td>Use code ABC123 at checkout today</td></tr></table></body>"#,
    );
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert_eq!(strategy, Some(Strategy::TextSearch));
    assert!(!items.is_empty());
}

// ---------------------------------------------------------------------------
// Strategy 5: structural scan
// ---------------------------------------------------------------------------

#[test]
fn structural_scan_as_last_resort() {
    // No classes, and the text avoids every vocabulary word so strategy 4
    // stays silent; the "$" signal plus block length triggers strategy 5.
    let doc = Html::parse_document(
        r#"<body><ul><li>Everything under $20 this weekend</li></ul></body>"#,
    );
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert_eq!(strategy, Some(Strategy::StructuralScan));
    assert_eq!(items.len(), 1);
}

#[test]
fn nothing_found_returns_empty_and_no_strategy() {
    let doc = Html::parse_document("<body><p>about our company</p></body>");
    let (items, strategy) = discover_coupon_items(doc.root_element(), worthepenny());
    assert!(items.is_empty());
    assert_eq!(strategy, None);
}
