//! String normalization shared across field extraction and merchant-info
//! handling.
//!
//! Every function here is pure and total: bad input degrades to `None` or an
//! empty string, never to an error.

/// Normalizes a raw coupon-code candidate.
///
/// Strips all non-alphanumeric characters and uppercases the remainder.
/// Results shorter than 3 or longer than 20 characters are rejected —
/// they are noise (a stray word, a concatenated sentence), not codes.
///
/// `normalize_code("save-20%!")` → `Some("SAVE20")`.
#[must_use]
pub fn normalize_code(raw: &str) -> Option<String> {
    let code: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_uppercase();

    if (3..=20).contains(&code.len()) {
        Some(code)
    } else {
        None
    }
}

/// Trims leading/trailing whitespace (including newlines) from a scraped
/// string.
#[must_use]
pub fn clean_text(s: &str) -> String {
    s.trim().to_owned()
}

/// Returns `true` when `s` (trimmed) falls within the given length bounds.
/// Used to decide whether a fallback candidate "looks like" a real title.
#[must_use]
pub fn within_length(s: &str, min: usize, max: usize) -> bool {
    let len = s.trim().chars().count();
    (min..=max).contains(&len)
}

/// Returns the first non-empty line of `s`, trimmed.
#[must_use]
pub fn first_text_line(s: &str) -> Option<&str> {
    s.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Title-cases a URL slug: `"suno-ai"` → `"Suno Ai"`.
///
/// Tokens are split on `-` and `_`; each token gets its first character
/// uppercased. Already-capitalized tokens pass through unchanged.
#[must_use]
pub fn title_case_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // normalize_code
    // -----------------------------------------------------------------------

    #[test]
    fn code_strips_punctuation_and_uppercases() {
        assert_eq!(normalize_code("save-20%!").as_deref(), Some("SAVE20"));
    }

    #[test]
    fn code_empty_input_is_absent() {
        assert!(normalize_code("").is_none());
    }

    #[test]
    fn code_too_short_is_absent() {
        assert!(normalize_code("a1").is_none());
    }

    #[test]
    fn code_too_long_is_absent() {
        assert!(normalize_code("THISCODEISWAYTOOLONGTOBEREAL").is_none());
    }

    #[test]
    fn code_pure_punctuation_is_absent() {
        assert!(normalize_code("---!!!").is_none());
    }

    #[test]
    fn code_already_clean_passes_through() {
        assert_eq!(normalize_code("WELCOME10").as_deref(), Some("WELCOME10"));
    }

    // -----------------------------------------------------------------------
    // title helpers
    // -----------------------------------------------------------------------

    #[test]
    fn within_length_checks_trimmed_bounds() {
        assert!(within_length("  hello  ", 5, 10));
        assert!(!within_length("hi", 5, 10));
        assert!(!within_length("a very long string here", 5, 10));
    }

    #[test]
    fn first_text_line_skips_blank_lines() {
        let text = "\n\n   \n  20% Off Sitewide  \nsecond line";
        assert_eq!(first_text_line(text), Some("20% Off Sitewide"));
    }

    #[test]
    fn first_text_line_none_for_blank_input() {
        assert!(first_text_line("\n   \n").is_none());
    }

    // -----------------------------------------------------------------------
    // title_case_slug
    // -----------------------------------------------------------------------

    #[test]
    fn slug_with_dashes() {
        assert_eq!(title_case_slug("suno-ai"), "Suno Ai");
    }

    #[test]
    fn slug_with_underscores() {
        assert_eq!(title_case_slug("blue_apron"), "Blue Apron");
    }

    #[test]
    fn slug_single_token() {
        assert_eq!(title_case_slug("acme"), "Acme");
    }

    #[test]
    fn slug_collapses_empty_tokens() {
        assert_eq!(title_case_slug("--acme--shop--"), "Acme Shop");
    }
}
