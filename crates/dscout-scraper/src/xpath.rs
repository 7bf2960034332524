//! Minimal XPath evaluation over a parsed HTML tree.
//!
//! Site configurations and the text-anchored discovery step only ever use a
//! narrow slice of XPath: descendant steps (`//div`, `//*`), attribute and
//! text predicates (`contains(@class, 'x')`, `contains(text(), 'x')`,
//! `@attr = 'x'`), chained steps, and `|` unions. No crate evaluates XPath
//! against an html5ever tree, so that subset is parsed by hand here — the
//! same approach used for other small grammars in this codebase.
//!
//! Anything outside the subset yields [`XPathError::Unsupported`]; callers
//! treat that as "step failed" and fall through to CSS selectors.

use std::collections::HashSet;

use ego_tree::NodeId;
use scraper::ElementRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XPathError {
    #[error("unsupported XPath expression: {0}")]
    Unsupported(String),
}

#[derive(Debug)]
struct Step {
    /// Element name test; `None` means `*`.
    name: Option<String>,
    predicates: Vec<Predicate>,
}

#[derive(Debug)]
enum Predicate {
    AttrContains { attr: String, value: String },
    AttrEquals { attr: String, value: String },
    TextContains { value: String },
}

/// Evaluates `expr` relative to `scope` and returns matching elements in
/// document order, deduplicated.
///
/// # Errors
///
/// Returns [`XPathError::Unsupported`] when the expression falls outside
/// the supported subset. Callers must treat this as a failed cascade step,
/// not a fatal condition.
pub fn evaluate<'a>(expr: &str, scope: ElementRef<'a>) -> Result<Vec<ElementRef<'a>>, XPathError> {
    let mut results: Vec<ElementRef<'a>> = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::new();

    for branch in split_unions(expr) {
        let steps = parse_path(branch.trim())?;
        for element in evaluate_steps(&steps, scope) {
            if seen.insert(element.id()) {
                results.push(element);
            }
        }
    }

    Ok(results)
}

fn evaluate_steps<'a>(steps: &[Step], scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut current: Vec<ElementRef<'a>> = vec![scope];

    for step in steps {
        let mut next: Vec<ElementRef<'a>> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();

        for node in &current {
            // Strict descendants, depth-first — document order.
            for descendant in node.descendants().skip(1) {
                let Some(element) = ElementRef::wrap(descendant) else {
                    continue;
                };
                if step_matches(&element, step) && seen.insert(element.id()) {
                    next.push(element);
                }
            }
        }

        current = next;
        if current.is_empty() {
            break;
        }
    }

    current
}

fn step_matches(element: &ElementRef<'_>, step: &Step) -> bool {
    if let Some(name) = &step.name {
        if !element.value().name().eq_ignore_ascii_case(name) {
            return false;
        }
    }

    step.predicates.iter().all(|p| predicate_matches(element, p))
}

fn predicate_matches(element: &ElementRef<'_>, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::AttrContains { attr, value } => element
            .value()
            .attr(attr)
            .is_some_and(|v| v.contains(value.as_str())),
        Predicate::AttrEquals { attr, value } => {
            element.value().attr(attr) == Some(value.as_str())
        }
        // `text()` means direct text children, not descendant text.
        Predicate::TextContains { value } => element
            .children()
            .filter_map(|child| child.value().as_text())
            .any(|text| text.contains(value.as_str())),
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Splits on `|` at the top level, ignoring `|` inside quoted strings or
/// brackets.
fn split_unions(expr: &str) -> Vec<&str> {
    let mut branches = Vec::new();
    let mut start = 0usize;
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for (i, c) in expr.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth -= 1,
            (None, '|') if depth == 0 => {
                branches.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    branches.push(&expr[start..]);
    branches
}

fn parse_path(path: &str) -> Result<Vec<Step>, XPathError> {
    let Some(rest) = path.strip_prefix("//") else {
        return Err(XPathError::Unsupported(path.to_owned()));
    };

    let mut steps = Vec::new();
    for raw_step in split_steps(rest) {
        steps.push(parse_step(raw_step, path)?);
    }

    if steps.is_empty() {
        return Err(XPathError::Unsupported(path.to_owned()));
    }
    Ok(steps)
}

/// Splits the remainder of a path on `//` boundaries outside brackets and
/// quotes, so chained descendant steps like `//div[...]//span` parse as two
/// steps. A single `/` (child axis) is not supported and surfaces later as
/// an invalid name test.
fn split_steps(rest: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let bytes = rest.as_bytes();
    let mut start = 0usize;
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'\'' | b'"') => quote = Some(b),
            (None, b'[' | b'(') => depth += 1,
            (None, b']' | b')') => depth -= 1,
            (None, b'/') if depth == 0 && i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                parts.push(&rest[start..i]);
                start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&rest[start..]);
    parts
}

fn parse_step(raw: &str, full_path: &str) -> Result<Step, XPathError> {
    let raw = raw.trim();
    let bracket = raw.find('[').unwrap_or(raw.len());
    let name_part = raw[..bracket].trim();

    if name_part.is_empty() || !is_valid_name_test(name_part) {
        return Err(XPathError::Unsupported(full_path.to_owned()));
    }

    let name = if name_part == "*" {
        None
    } else {
        Some(name_part.to_ascii_lowercase())
    };

    let mut predicates = Vec::new();
    let mut rest = raw[bracket..].trim();
    while let Some(inner_rest) = rest.strip_prefix('[') {
        let Some(close) = find_matching_bracket(inner_rest) else {
            return Err(XPathError::Unsupported(full_path.to_owned()));
        };
        predicates.push(parse_predicate(&inner_rest[..close], full_path)?);
        rest = inner_rest[close + 1..].trim();
    }
    if !rest.is_empty() {
        return Err(XPathError::Unsupported(full_path.to_owned()));
    }

    Ok(Step { name, predicates })
}

fn is_valid_name_test(name: &str) -> bool {
    name == "*"
        || name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn find_matching_bracket(s: &str) -> Option<usize> {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn parse_predicate(raw: &str, full_path: &str) -> Result<Predicate, XPathError> {
    let raw = raw.trim();

    if let Some(inner) = raw
        .strip_prefix("contains(")
        .and_then(|s| s.strip_suffix(')'))
    {
        let Some((lhs, rhs)) = split_once_top_level(inner, ',') else {
            return Err(XPathError::Unsupported(full_path.to_owned()));
        };
        let value = parse_string_literal(rhs.trim())
            .ok_or_else(|| XPathError::Unsupported(full_path.to_owned()))?;
        let lhs = lhs.trim();

        if lhs == "text()" {
            return Ok(Predicate::TextContains { value });
        }
        if let Some(attr) = lhs.strip_prefix('@') {
            return Ok(Predicate::AttrContains {
                attr: attr.to_owned(),
                value,
            });
        }
        return Err(XPathError::Unsupported(full_path.to_owned()));
    }

    if let Some((lhs, rhs)) = split_once_top_level(raw, '=') {
        let lhs = lhs.trim();
        if let Some(attr) = lhs.strip_prefix('@') {
            let value = parse_string_literal(rhs.trim())
                .ok_or_else(|| XPathError::Unsupported(full_path.to_owned()))?;
            return Ok(Predicate::AttrEquals {
                attr: attr.to_owned(),
                value,
            });
        }
    }

    Err(XPathError::Unsupported(full_path.to_owned()))
}

fn split_once_top_level(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut quote: Option<char> = None;
    let mut depth = 0i32;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth -= 1,
            (None, _) if c == sep && depth == 0 => {
                return Some((&s[..i], &s[i + c.len_utf8()..]));
            }
            _ => {}
        }
    }
    None
}

fn parse_string_literal(s: &str) -> Option<String> {
    let first = s.chars().next()?;
    if (first == '\'' || first == '"') && s.len() >= 2 && s.ends_with(first) {
        return Some(s[1..s.len() - 1].to_owned());
    }
    None
}
