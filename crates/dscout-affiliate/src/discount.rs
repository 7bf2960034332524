//! Free-text discount parsing and best-offer selection.
//!
//! `discount_value` strings arrive as arbitrary marketing copy. The parser
//! runs a fixed-order regex cascade (first match wins) and everything that
//! matches nothing is preserved verbatim as [`ParsedDiscount::Other`] —
//! the original text is never lost.

use regex::Regex;

/// A typed view of a free-text discount string.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDiscount {
    /// `"25% off"` → `Percent(25)`.
    Percent(u32),
    /// `"$10 off"` → `Amount(10.0)`.
    Amount(f64),
    /// `"Buy 2 Get 1"` → `BuyXGetY { buy: 2, get: 1 }`.
    BuyXGetY { buy: u32, get: u32 },
    /// `"up to 70% off"` → `UpToPercent(70)`.
    UpToPercent(u32),
    /// Anything else, original text preserved.
    Other(String),
}

impl ParsedDiscount {
    /// The percent value of percent-family variants (`Percent`,
    /// `UpToPercent`), used for aggregate stats and best-offer ranking.
    #[must_use]
    pub fn percent_value(&self) -> Option<u32> {
        match self {
            ParsedDiscount::Percent(v) | ParsedDiscount::UpToPercent(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn amount_value(&self) -> Option<f64> {
        match self {
            ParsedDiscount::Amount(v) => Some(*v),
            _ => None,
        }
    }
}

/// Parses a free-text discount string.
///
/// Matching is case-insensitive over whitespace-collapsed text, tried in a
/// fixed order: percent-off → fixed-amount-off → buy-X-get-Y →
/// up-to-percent → `Other`. Returns `None` only for empty/blank input.
#[must_use]
pub fn parse_discount(text: &str) -> Option<ParsedDiscount> {
    let original = text.trim();
    if original.is_empty() {
        return None;
    }
    let lower = collapse_whitespace(original).to_lowercase();

    // Percent-off. A percent that is an "up to" cap belongs to the
    // up-to-percent variant below, so each match's prefix window is
    // checked; the first percent outside an "up to" window wins.
    let percent = Regex::new(r"(\d{1,3})\s*%\s*off").expect("valid regex");
    for cap in percent.captures_iter(&lower) {
        let m = cap.get(0).expect("whole match");
        let prefix = &lower[..m.start()];
        if prefix.trim_end().ends_with("up to") {
            continue;
        }
        if let Ok(value) = cap[1].parse::<u32>() {
            return Some(ParsedDiscount::Percent(value));
        }
    }

    let amount = Regex::new(r"[$€£]\s*(\d+(?:\.\d+)?)\s*off").expect("valid regex");
    if let Some(cap) = amount.captures(&lower) {
        if let Ok(value) = cap[1].parse::<f64>() {
            return Some(ParsedDiscount::Amount(value));
        }
    }

    let bxgy = Regex::new(r"buy\s*(\d+)\s*,?\s*get\s*(\d+)").expect("valid regex");
    if let Some(cap) = bxgy.captures(&lower) {
        if let (Ok(buy), Ok(get)) = (cap[1].parse::<u32>(), cap[2].parse::<u32>()) {
            return Some(ParsedDiscount::BuyXGetY { buy, get });
        }
    }

    let upto = Regex::new(r"up\s*to\s*(\d{1,3})\s*%").expect("valid regex");
    if let Some(cap) = upto.captures(&lower) {
        if let Ok(value) = cap[1].parse::<u32>() {
            return Some(ParsedDiscount::UpToPercent(value));
        }
    }

    Some(ParsedDiscount::Other(original.to_owned()))
}

/// Picks the best offer string from a store's discount texts.
///
/// Percent-family discounts win over amounts, amounts win over everything
/// else; within a family the highest value wins. When no discount parses
/// into a ranked family, the first original text is returned verbatim.
#[must_use]
pub fn best_offer(discounts: &[String]) -> Option<&str> {
    let parsed: Vec<(&str, ParsedDiscount)> = discounts
        .iter()
        .filter_map(|text| parse_discount(text).map(|p| (text.as_str(), p)))
        .collect();

    if let Some((text, _)) = parsed
        .iter()
        .filter(|(_, p)| p.percent_value().is_some())
        .max_by_key(|(_, p)| p.percent_value().unwrap_or(0))
    {
        return Some(text);
    }

    if let Some((text, _)) = parsed
        .iter()
        .filter(|(_, p)| p.amount_value().is_some())
        .max_by(|(_, a), (_, b)| {
            a.amount_value()
                .unwrap_or(0.0)
                .total_cmp(&b.amount_value().unwrap_or(0.0))
        })
    {
        return Some(text);
    }

    parsed.first().map(|(text, _)| *text)
}

/// Aggregate percent statistics across a store's parsed discounts.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountStats {
    pub min_percent: u32,
    pub max_percent: u32,
    pub avg_percent: f64,
}

/// Computes min/max/avg over the percent-family discounts; `None` when no
/// discount parses to a percent.
#[must_use]
pub fn percent_stats(discounts: &[String]) -> Option<DiscountStats> {
    let percents: Vec<u32> = discounts
        .iter()
        .filter_map(|text| parse_discount(text))
        .filter_map(|p| p.percent_value())
        .collect();

    if percents.is_empty() {
        return None;
    }

    let min_percent = *percents.iter().min().expect("non-empty");
    let max_percent = *percents.iter().max().expect("non-empty");
    let sum: u64 = percents.iter().map(|&v| u64::from(v)).sum();
    #[allow(clippy::cast_precision_loss)]
    let avg_percent = sum as f64 / percents.len() as f64;

    Some(DiscountStats {
        min_percent,
        max_percent,
        avg_percent,
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_discount
    // -----------------------------------------------------------------------

    #[test]
    fn percent_off() {
        assert_eq!(
            parse_discount("Save 25% Off orders"),
            Some(ParsedDiscount::Percent(25))
        );
    }

    #[test]
    fn percent_off_with_spacing_and_case_noise() {
        assert_eq!(
            parse_discount("  sAvE   30 %  OFF today "),
            Some(ParsedDiscount::Percent(30))
        );
    }

    #[test]
    fn amount_off() {
        assert_eq!(
            parse_discount("$10 off"),
            Some(ParsedDiscount::Amount(10.0))
        );
    }

    #[test]
    fn amount_off_decimal() {
        assert_eq!(
            parse_discount("Get $12.50 off your order"),
            Some(ParsedDiscount::Amount(12.5))
        );
    }

    #[test]
    fn buy_x_get_y() {
        assert_eq!(
            parse_discount("Buy 2 Get 1"),
            Some(ParsedDiscount::BuyXGetY { buy: 2, get: 1 })
        );
    }

    #[test]
    fn up_to_percent() {
        assert_eq!(
            parse_discount("up to 70% off"),
            Some(ParsedDiscount::UpToPercent(70))
        );
    }

    #[test]
    fn up_to_percent_without_off() {
        assert_eq!(
            parse_discount("Up To 40% savings"),
            Some(ParsedDiscount::UpToPercent(40))
        );
    }

    #[test]
    fn other_preserves_original_text() {
        assert_eq!(
            parse_discount("Free gift"),
            Some(ParsedDiscount::Other("Free gift".to_owned()))
        );
    }

    #[test]
    fn empty_input_is_none() {
        assert!(parse_discount("").is_none());
        assert!(parse_discount("   ").is_none());
    }

    #[test]
    fn plain_percent_beats_up_to_when_both_present() {
        // "20% off plus up to 50% clearance" — the plain percent appears
        // outside an "up to" window, so it wins by cascade order.
        assert_eq!(
            parse_discount("20% off plus up to 50% clearance"),
            Some(ParsedDiscount::Percent(20))
        );
    }

    #[test]
    fn plain_percent_after_up_to_still_wins() {
        assert_eq!(
            parse_discount("up to 50% off clearance plus 20% off sitewide"),
            Some(ParsedDiscount::Percent(20))
        );
    }

    // -----------------------------------------------------------------------
    // best_offer
    // -----------------------------------------------------------------------

    fn owned(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn highest_percent_wins() {
        let discounts = owned(&["20% off shoes", "$15 off orders", "50% off hats"]);
        assert_eq!(best_offer(&discounts), Some("50% off hats"));
    }

    #[test]
    fn up_to_percent_competes_with_plain_percent() {
        let discounts = owned(&["up to 70% off", "30% off"]);
        assert_eq!(best_offer(&discounts), Some("up to 70% off"));
    }

    #[test]
    fn amounts_used_when_no_percents() {
        let discounts = owned(&["$5 off", "$25 off orders", "Free gift"]);
        assert_eq!(best_offer(&discounts), Some("$25 off orders"));
    }

    #[test]
    fn first_original_text_when_nothing_ranks() {
        let discounts = owned(&["Free gift", "Bonus points"]);
        assert_eq!(best_offer(&discounts), Some("Free gift"));
    }

    #[test]
    fn empty_list_is_none() {
        assert_eq!(best_offer(&[]), None);
    }

    // -----------------------------------------------------------------------
    // percent_stats
    // -----------------------------------------------------------------------

    #[test]
    fn stats_over_percent_family() {
        let discounts = owned(&["10% off", "up to 50% off", "30% off", "$5 off"]);
        let stats = percent_stats(&discounts).unwrap();
        assert_eq!(stats.min_percent, 10);
        assert_eq!(stats.max_percent, 50);
        assert!((stats.avg_percent - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_none_without_percents() {
        assert!(percent_stats(&owned(&["$5 off", "Free gift"])).is_none());
    }
}
