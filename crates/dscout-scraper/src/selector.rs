//! Selector specs and the null-safe element locator.
//!
//! A [`SelectorSpec`] describes how to find an element: one CSS selector, an
//! ordered list of CSS selectors, or an XPath expression with CSS fallbacks.
//! Evaluation order is deterministic and the first successful match stops
//! the search — the cascade contract reused at every extraction site.
//!
//! Locating never returns an error: invalid selectors and unsupported XPath
//! are logged and treated as a failed step, because every call site must
//! degrade gracefully on unfamiliar page markup.

use scraper::{ElementRef, Selector};

use crate::xpath;

#[derive(Debug, Clone)]
pub enum SelectorSpec {
    /// A single CSS selector.
    Css(String),
    /// An ordered list of CSS selectors; the first that matches wins.
    CssList(Vec<String>),
    /// An XPath expression tried first, with CSS fallbacks in order.
    XPathWithFallback {
        xpath: String,
        fallbacks: Vec<String>,
    },
}

impl SelectorSpec {
    #[must_use]
    pub fn css(selector: &str) -> Self {
        SelectorSpec::Css(selector.to_owned())
    }

    #[must_use]
    pub fn css_list(selectors: &[&str]) -> Self {
        SelectorSpec::CssList(selectors.iter().map(|s| (*s).to_owned()).collect())
    }

    #[must_use]
    pub fn xpath(xpath: &str, fallbacks: &[&str]) -> Self {
        SelectorSpec::XPathWithFallback {
            xpath: xpath.to_owned(),
            fallbacks: fallbacks.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// The CSS selectors of this spec, in evaluation order (for cascade
    /// steps that only consider the CSS portion).
    #[must_use]
    pub fn css_selectors(&self) -> Vec<&str> {
        match self {
            SelectorSpec::Css(s) => vec![s.as_str()],
            SelectorSpec::CssList(list) => list.iter().map(String::as_str).collect(),
            SelectorSpec::XPathWithFallback { fallbacks, .. } => {
                fallbacks.iter().map(String::as_str).collect()
            }
        }
    }

    /// The XPath expression of this spec, when it has one.
    #[must_use]
    pub fn xpath_expr(&self) -> Option<&str> {
        match self {
            SelectorSpec::XPathWithFallback { xpath, .. } => Some(xpath.as_str()),
            _ => None,
        }
    }
}

/// Finds the first element matching `spec` within `scope`, or `None`.
#[must_use]
pub fn locate<'a>(spec: &SelectorSpec, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
    locate_all(spec, scope).into_iter().next()
}

/// Finds all elements matching `spec` within `scope`.
///
/// For the XPath variant, a successful XPath evaluation (≥1 node) means the
/// CSS fallbacks are never consulted.
#[must_use]
pub fn locate_all<'a>(spec: &SelectorSpec, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    match spec {
        SelectorSpec::Css(selector) => select_all(selector, scope),
        SelectorSpec::CssList(selectors) => first_non_empty(selectors, scope),
        SelectorSpec::XPathWithFallback { xpath, fallbacks } => {
            match xpath::evaluate(xpath, scope) {
                Ok(nodes) if !nodes.is_empty() => nodes,
                Ok(_) => first_non_empty(fallbacks, scope),
                Err(err) => {
                    tracing::debug!(xpath, %err, "xpath step failed; using CSS fallbacks");
                    first_non_empty(fallbacks, scope)
                }
            }
        }
    }
}

fn first_non_empty<'a, S: AsRef<str>>(selectors: &[S], scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    for selector in selectors {
        let matches = select_all(selector.as_ref(), scope);
        if !matches.is_empty() {
            return matches;
        }
    }
    Vec::new()
}

/// Runs a scoped CSS query under `scope`. An unparseable selector is logged
/// and yields no matches.
#[must_use]
pub fn select_all<'a>(css: &str, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).collect(),
        Err(err) => {
            tracing::debug!(css, %err, "invalid CSS selector; treating as no match");
            Vec::new()
        }
    }
}

/// Runs a scoped CSS query under `scope` and returns the first match.
#[must_use]
pub fn select_first<'a>(css: &str, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => scope.select(&selector).next(),
        Err(err) => {
            tracing::debug!(css, %err, "invalid CSS selector; treating as no match");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn single_css_returns_first_match() {
        let html = Html::parse_document(r#"<p class="x">one</p><p class="x">two</p>"#);
        let found = locate(&SelectorSpec::css("p.x"), html.root_element()).unwrap();
        assert_eq!(found.text().collect::<String>(), "one");
    }

    #[test]
    fn single_css_none_when_absent() {
        let html = Html::parse_document("<p>one</p>");
        assert!(locate(&SelectorSpec::css(".missing"), html.root_element()).is_none());
    }

    #[test]
    fn css_list_first_matching_selector_wins() {
        let html = Html::parse_document(r#"<div class="b">second</div>"#);
        let spec = SelectorSpec::css_list(&[".a", ".b", ".c"]);
        let found = locate(&spec, html.root_element()).unwrap();
        assert_eq!(found.text().collect::<String>(), "second");
    }

    #[test]
    fn css_list_stops_at_first_yielding_selector() {
        // Both .a and .b exist; .a comes first in the list so .b must not
        // contribute matches.
        let html = Html::parse_document(r#"<div class="a">a</div><div class="b">b</div>"#);
        let spec = SelectorSpec::css_list(&[".a", ".b"]);
        let found = locate_all(&spec, html.root_element());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text().collect::<String>(), "a");
    }

    #[test]
    fn xpath_match_skips_css_fallbacks() {
        // The fallback selector also matches; the XPath result must win.
        let html = Html::parse_document(
            r#"<div class="via-xpath" data-k="v">x</div><div class="via-css">c</div>"#,
        );
        let spec = SelectorSpec::xpath("//div[contains(@data-k,'v')]", &[".via-css"]);
        let found = locate_all(&spec, html.root_element());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text().collect::<String>(), "x");
    }

    #[test]
    fn xpath_zero_nodes_falls_through_to_css() {
        let html = Html::parse_document(r#"<div class="via-css">c</div>"#);
        let spec = SelectorSpec::xpath("//article", &[".via-css"]);
        let found = locate(&spec, html.root_element()).unwrap();
        assert_eq!(found.text().collect::<String>(), "c");
    }

    #[test]
    fn xpath_error_falls_through_to_css() {
        let html = Html::parse_document(r#"<div class="via-css">c</div>"#);
        let spec = SelectorSpec::xpath("/unsupported/axis", &[".via-css"]);
        let found = locate(&spec, html.root_element()).unwrap();
        assert_eq!(found.text().collect::<String>(), "c");
    }

    #[test]
    fn invalid_css_selector_yields_no_match_not_panic() {
        let html = Html::parse_document("<p>one</p>");
        assert!(locate(&SelectorSpec::css("p[[["), html.root_element()).is_none());
    }

    #[test]
    fn everything_failing_yields_none() {
        let html = Html::parse_document("<p>one</p>");
        let spec = SelectorSpec::xpath("//article", &[".a", ".b"]);
        assert!(locate(&spec, html.root_element()).is_none());
    }
}
