//! Coupon-item discovery cascade.
//!
//! Tries strategies in priority order (configured selectors, configured
//! XPath, generic class-name heuristics, text-anchored search, structural
//! scan) and returns the first non-empty result. Later strategies trade
//! precision for resilience against unannounced markup changes on
//! third-party sites; their higher false-positive rate is compensated by
//! the sanity filter applied to extraction results afterwards.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::ElementRef;

use crate::selector::{select_all, select_first};
use crate::sites::SiteConfig;
use crate::xpath;

/// Which cascade step produced the item list. Exposed for logging and for
/// asserting cascade order in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ConfiguredSelectors,
    ConfiguredXPath,
    ClassHeuristics,
    TextSearch,
    StructuralScan,
}

/// Vocabulary a candidate item's text must touch for the heuristic steps.
const ITEM_VOCABULARY: [&str; 8] = [
    "coupon", "code", "deal", "offer", "discount", "%", "save", "off",
];

/// Broad class-substring selectors for strategy 3, most specific first.
/// The trailing any-classed-block probes catch sites using opaque class
/// names; the text vocabulary/length filter below keeps them honest.
const GENERIC_CLASS_SELECTORS: [&str; 8] = [
    r#"[class*="coupon"]"#,
    r#"[class*="deal"]"#,
    r#"[class*="offer"]"#,
    r#"[class*="promo"]"#,
    r#"[class*="discount"]"#,
    r#"[class*="code"]"#,
    "div[class]",
    "li[class]",
];

/// Words probed by the text-anchored XPath step (strategy 4); `%` has no
/// case variants and is probed as-is.
const TEXT_SEARCH_WORDS: [&str; 7] = ["coupon", "code", "deal", "offer", "discount", "save", "off"];

const TEXT_SEARCH_LIMIT: usize = 20;

/// Tags probed by the structural last-resort step (strategy 5).
const STRUCTURAL_TAGS: [&str; 5] = ["div", "article", "section", "li", "tr"];

/// Signals required by the structural step.
const STRUCTURAL_SIGNALS: [&str; 4] = ["$", "%", "free", "save"];

const STRUCTURAL_LIMIT: usize = 10;

/// Finds the coupon item nodes on a page, returning the matched elements
/// and the strategy that produced them. An empty result with `None` means
/// every strategy came up dry — not an error.
#[must_use]
pub fn discover_coupon_items<'a>(
    root: ElementRef<'a>,
    config: &SiteConfig,
) -> (Vec<ElementRef<'a>>, Option<Strategy>) {
    let container = resolve_container(root, config);

    // Strategy 1: configured container + configured item selectors.
    if let Some(spec) = &config.selectors.coupon_items {
        for css in spec.css_selectors() {
            let items = select_all(css, container);
            if !items.is_empty() {
                tracing::debug!(site = config.key, css, count = items.len(), "items via configured selector");
                return (items, Some(Strategy::ConfiguredSelectors));
            }
        }

        // Strategy 2: configured XPath, scoped to the same container.
        if let Some(expr) = spec.xpath_expr() {
            match xpath::evaluate(expr, container) {
                Ok(items) if !items.is_empty() => {
                    tracing::debug!(site = config.key, expr, count = items.len(), "items via configured xpath");
                    return (items, Some(Strategy::ConfiguredXPath));
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(site = config.key, expr, %err, "configured xpath failed");
                }
            }
        }
    }

    // Strategy 3: generic class-name heuristics, page-wide.
    for css in GENERIC_CLASS_SELECTORS {
        let items: Vec<ElementRef<'a>> = select_all(css, root)
            .into_iter()
            .filter(|el| {
                let text = el.text().collect::<String>();
                let trimmed = text.trim();
                (10..=1000).contains(&trimmed.chars().count()) && touches_vocabulary(trimmed)
            })
            .collect();
        if !items.is_empty() {
            tracing::debug!(site = config.key, css, count = items.len(), "items via class heuristics");
            return (items, Some(Strategy::ClassHeuristics));
        }
    }

    // Strategy 4: text-anchored search.
    let items = text_anchored_search(root);
    if !items.is_empty() {
        tracing::debug!(site = config.key, count = items.len(), "items via text search");
        return (items, Some(Strategy::TextSearch));
    }

    // Strategy 5: structural last resort.
    let items = structural_scan(root);
    if !items.is_empty() {
        tracing::debug!(site = config.key, count = items.len(), "items via structural scan");
        return (items, Some(Strategy::StructuralScan));
    }

    tracing::debug!(site = config.key, "no coupon items found by any strategy");
    (Vec::new(), None)
}

/// Resolves the coupon-list container: each configured selector in order,
/// defaulting to the whole document when none matches.
fn resolve_container<'a>(root: ElementRef<'a>, config: &SiteConfig) -> ElementRef<'a> {
    for css in &config.selectors.coupon_container {
        if let Some(container) = select_first(css, root) {
            return container;
        }
    }
    root
}

fn touches_vocabulary(text: &str) -> bool {
    let lower = text.to_lowercase();
    ITEM_VOCABULARY.iter().any(|word| lower.contains(word))
}

/// Elements whose direct text contains a vocabulary word (any of three
/// case variants), up to [`TEXT_SEARCH_LIMIT`] matches of trimmed length
/// > 5.
fn text_anchored_search(root: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut found = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();

    let mut probes: Vec<String> = Vec::new();
    for word in TEXT_SEARCH_WORDS {
        probes.push(word.to_owned());
        probes.push(capitalize_ascii(word));
        probes.push(word.to_uppercase());
    }
    probes.push("%".to_owned());

    for probe in probes {
        let expr = format!("//*[contains(text(),'{probe}')]");
        let Ok(matches) = xpath::evaluate(&expr, root) else {
            continue;
        };
        for element in matches {
            let text = element.text().collect::<String>();
            if text.trim().chars().count() > 5 && seen.insert(element.id()) {
                found.push(element);
                if found.len() >= TEXT_SEARCH_LIMIT {
                    return found;
                }
            }
        }
    }

    found
}

/// Structured blocks with modest text length carrying a money/discount
/// signal, up to [`STRUCTURAL_LIMIT`] across all probed tags.
fn structural_scan(root: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut found = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();

    for tag in STRUCTURAL_TAGS {
        for element in select_all(tag, root) {
            let text = element.text().collect::<String>();
            let trimmed = text.trim();
            if !(20..=500).contains(&trimmed.chars().count()) {
                continue;
            }
            let lower = trimmed.to_lowercase();
            if !STRUCTURAL_SIGNALS.iter().any(|s| lower.contains(s)) {
                continue;
            }
            if seen.insert(element.id()) {
                found.push(element);
                if found.len() >= STRUCTURAL_LIMIT {
                    return found;
                }
            }
        }
    }

    found
}

fn capitalize_ascii(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod tests;
