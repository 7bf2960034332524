//! Once-per-page merchant info extraction.
//!
//! A scrape session handles exactly one merchant, so these fields are
//! extracted once and attached to every [`dscout_core::CouponRecord`]
//! produced from the page.

use scraper::{ElementRef, Html};

use crate::normalize::title_case_slug;
use crate::selector::{locate, select_all, select_first};
use crate::sites::SiteConfig;

/// Merchant fields shared by all records of one scrape session. Empty
/// strings mean "unknown"; `name` is never empty (final fallback literal).
#[derive(Debug, Clone)]
pub struct MerchantInfo {
    pub name: String,
    pub domain: String,
    pub url: String,
    pub logo: String,
    pub description: String,
}

const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Extracts merchant info from a loaded page.
///
/// Name resolution order: configured merchant link text → page title →
/// URL slug/subdomain (title-cased) → `"Unknown Merchant"`.
#[must_use]
pub fn extract_merchant_info(doc: &Html, config: &SiteConfig, page_url: &str) -> MerchantInfo {
    let root = doc.root_element();

    // Merchant fields are looked up under the configured merchant
    // container when one matches; the whole document otherwise.
    let scope = config
        .selectors
        .merchant_container
        .as_ref()
        .and_then(|spec| locate(spec, root))
        .unwrap_or(root);

    let link = config
        .selectors
        .merchant_link
        .as_ref()
        .and_then(|spec| locate(spec, scope));
    let link_text = link
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .unwrap_or_default();
    let link_href = link
        .and_then(|el| el.value().attr("href"))
        .unwrap_or_default()
        .to_owned();

    let page_title = select_first("title", root)
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .unwrap_or_default();

    let name = merchant_name(config, &link_text, &page_title, page_url);

    let url = if link_href.is_empty() {
        String::new()
    } else {
        config
            .rules
            .extract_target_url(&link_href)
            .unwrap_or(link_href)
    };
    let domain = bare_domain(&url);

    let logo = merchant_logo(scope, root, config);

    let description = config
        .selectors
        .merchant_description
        .as_ref()
        .and_then(|spec| locate(spec, scope))
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .unwrap_or_default();

    MerchantInfo {
        name,
        domain,
        url,
        logo,
        description,
    }
}

fn merchant_name(config: &SiteConfig, link_text: &str, page_title: &str, page_url: &str) -> String {
    if !link_text.is_empty() {
        if let Some(name) = config.rules.extract_merchant_name(link_text) {
            return name;
        }
    }
    if !page_title.is_empty() {
        if let Some(name) = config.rules.extract_merchant_name(page_title) {
            return name;
        }
    }
    if let Some(slug) = slug_from_url(page_url) {
        let name = config.rules.clean_merchant_name(&title_case_slug(&slug));
        if !name.is_empty() {
            return name;
        }
    }
    UNKNOWN_MERCHANT.to_owned()
}

/// Finds a merchant logo URL: configured selectors first, then a page-wide
/// `<img>` scan for logo/brand hints, excluding placeholder and loading
/// images.
fn merchant_logo<'a>(scope: ElementRef<'a>, root: ElementRef<'a>, config: &SiteConfig) -> String {
    if let Some(element) = config
        .selectors
        .merchant_logo
        .as_ref()
        .and_then(|spec| locate(spec, scope))
    {
        if let Some(src) = image_src(element) {
            return src;
        }
    }

    for img in select_all("img", root) {
        let Some(src) = image_src(img) else { continue };
        let src_lower = src.to_lowercase();
        if src_lower.contains("placeholder") || src_lower.contains("loading") {
            continue;
        }
        let alt_lower = img.value().attr("alt").unwrap_or_default().to_lowercase();
        if src_lower.contains("logo")
            || src_lower.contains("brand")
            || alt_lower.contains("logo")
            || alt_lower.contains("brand")
        {
            return src;
        }
    }

    String::new()
}

fn image_src(img: ElementRef<'_>) -> Option<String> {
    img.value()
        .attr("src")
        .or_else(|| img.value().attr("data-src"))
        .map(str::to_owned)
        .filter(|src| !src.is_empty())
}

/// Derives a name slug from the page URL: the last non-empty path segment,
/// else the first host label when it is not `www`. A domain-like segment
/// (`acme.com`) is reduced to its first label.
fn slug_from_url(page_url: &str) -> Option<String> {
    let without_scheme = page_url
        .strip_prefix("https://")
        .or_else(|| page_url.strip_prefix("http://"))
        .unwrap_or(page_url);
    let without_query = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme);

    let mut parts = without_query.split('/');
    let host = parts.next().unwrap_or_default();

    if let Some(segment) = parts.filter(|s| !s.is_empty()).next_back() {
        let slug = segment.split('.').next().unwrap_or(segment);
        if !slug.is_empty() {
            return Some(slug.to_owned());
        }
    }

    let label = host.split('.').next().unwrap_or_default();
    if label.is_empty() || label.eq_ignore_ascii_case("www") {
        None
    } else {
        Some(label.to_owned())
    }
}

/// Reduces a URL to its bare domain: no scheme, no `www.`, no path.
#[must_use]
pub fn bare_domain(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let host = without_scheme.split(['/', '?', '#']).next().unwrap_or("");
    host.strip_prefix("www.").unwrap_or(host).to_owned()
}
