//! Per-field extraction cascades for a single coupon item.
//!
//! Each extractor follows the same shape: configured selector → attribute
//! lookup → text content → regex scan of the item's full text. An empty
//! result means "field unknown", never an error.

use regex::Regex;
use scraper::ElementRef;

use crate::normalize::{clean_text, first_text_line, normalize_code, within_length};
use crate::selector::{locate, select_all, SelectorSpec};

/// Attributes checked on a located code element before its text content.
const CODE_ATTRIBUTES: [&str; 3] = ["data-code", "data-coupon", "data-promo"];

/// Generic tag/class selectors tried for a title when the configured
/// selector yields nothing.
const GENERIC_TITLE_SELECTORS: [&str; 11] = [
    "h1", "h2", "h3", "h4", "h5", ".title", ".heading", "strong", "b", "span", "p",
];

/// Extracts a field as plain text: locate via `spec`, trim. Empty string
/// when the spec is absent or nothing matches.
#[must_use]
pub fn extract_text_field(spec: Option<&SelectorSpec>, scope: ElementRef<'_>) -> String {
    spec.and_then(|s| locate(s, scope))
        .map(|element| clean_text(&element.text().collect::<String>()))
        .unwrap_or_default()
}

/// Extracts a coupon code from one item node.
///
/// Order: configured selector (data attributes first, then element text),
/// then a regex scan over the item's full text. All candidates pass through
/// [`normalize_code`]; `None` means the item is a plain deal.
#[must_use]
pub fn extract_code(spec: Option<&SelectorSpec>, item: ElementRef<'_>) -> Option<String> {
    if let Some(element) = spec.and_then(|s| locate(s, item)) {
        for attr in CODE_ATTRIBUTES {
            if let Some(code) = element.value().attr(attr).and_then(normalize_code) {
                return Some(code);
            }
        }
        let text = element.text().collect::<String>();
        if let Some(code) = normalize_code(text.trim()) {
            return Some(code);
        }
    }

    let full_text = item.text().collect::<String>();
    code_from_text(&full_text)
}

/// Scans free text for a plausible coupon code.
///
/// Patterns are tried in a fixed order, first plausible token wins:
/// 1. a labeled code (`"Code: SAVE20"`, `"Coupon SPRING"`),
/// 2. a bare uppercase token with at least one letter (`"SAVE20"`),
/// 3. an instruction phrase (`"use code welcome10"`),
/// 4. any mixed letter-digit token.
#[must_use]
pub fn code_from_text(text: &str) -> Option<String> {
    let labeled = Regex::new(r"(?:[Cc]ode|[Cc]oupon|[Pp]romo|[Dd]iscount)[:\s]+([A-Z0-9]{3,20})\b")
        .expect("valid regex");
    if let Some(code) = labeled
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| normalize_code(m.as_str()))
    {
        return Some(code);
    }

    // Bare uppercase token. Require at least one letter: years and prices
    // are uppercase-alphanumeric too, but they are not codes.
    let bare = Regex::new(r"\b([A-Z0-9]{4,20})\b").expect("valid regex");
    for cap in bare.captures_iter(text) {
        let token = cap.get(1).map_or("", |m| m.as_str());
        if token.chars().any(|c| c.is_ascii_uppercase()) {
            if let Some(code) = normalize_code(token) {
                return Some(code);
            }
        }
    }

    let instruction =
        Regex::new(r"(?i)(?:use|apply|enter)\s+code\s+([A-Za-z0-9]{3,20})\b").expect("valid regex");
    if let Some(code) = instruction
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| normalize_code(m.as_str()))
    {
        return Some(code);
    }

    mixed_token(text).and_then(|token| normalize_code(&token))
}

/// Finds the first token of 4..=20 alphanumeric characters containing both
/// a letter and a digit. The regex crate has no lookahead, so this is a
/// plain token scan.
fn mixed_token(text: &str) -> Option<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| (4..=20).contains(&token.len()))
        .find(|token| {
            token.chars().any(|c| c.is_ascii_alphabetic())
                && token.chars().any(|c| c.is_ascii_digit())
        })
        .map(str::to_owned)
}

/// Extracts the promotion title from one item node, without synthesis.
///
/// Cascade: configured selector → generic tag/class selectors (first text
/// in the 5–200 char range) → the item's own first non-empty text line
/// (5–300 chars). Returns an empty string when all three fail; the caller
/// decides whether to synthesize or discard.
#[must_use]
pub fn extract_raw_title(spec: Option<&SelectorSpec>, item: ElementRef<'_>) -> String {
    let configured = extract_text_field(spec, item);
    if !configured.is_empty() {
        return configured;
    }

    for selector in GENERIC_TITLE_SELECTORS {
        for element in select_all(selector, item) {
            let text = element.text().collect::<String>().trim().to_owned();
            if within_length(&text, 5, 200) {
                return text;
            }
        }
    }

    let own_text = item.text().collect::<String>();
    if let Some(line) = first_text_line(&own_text) {
        if within_length(line, 5, 300) {
            return line.to_owned();
        }
    }

    String::new()
}

/// Builds a synthesized title for an item whose title extraction came up
/// empty but which still carries signal (a code or a description).
#[must_use]
pub fn synthesize_title(merchant_name: &str, index: usize, code: Option<&str>) -> String {
    match code {
        Some(code) => format!("{merchant_name} Discount Code: {code}"),
        None => format!("{merchant_name} Special Offer #{}", index + 1),
    }
}

/// Derives the subtitle bucket from a promotion title: a category keyword
/// when one is present, else the leading percent/amount token, else
/// `"Deal"`.
#[must_use]
pub fn derive_subtitle(title: &str) -> String {
    let lower = title.to_lowercase();

    const BUCKETS: [(&str, &str); 9] = [
        ("free shipping", "Free Shipping"),
        ("shipping", "Shipping"),
        ("sitewide", "Sitewide"),
        ("storewide", "Sitewide"),
        ("clearance", "Clearance"),
        ("student", "Student"),
        ("first order", "New Customer"),
        ("new customer", "New Customer"),
        ("gift", "Gift"),
    ];
    for (needle, bucket) in BUCKETS {
        if lower.contains(needle) {
            return bucket.to_owned();
        }
    }

    let percent = Regex::new(r"(\d{1,3})\s*%").expect("valid regex");
    if let Some(cap) = percent.captures(&lower) {
        return format!("{}% Off", &cap[1]);
    }

    let amount = Regex::new(r"\$\s*(\d+)").expect("valid regex");
    if let Some(cap) = amount.captures(&lower) {
        return format!("${} Off", &cap[1]);
    }

    "Deal".to_owned()
}
