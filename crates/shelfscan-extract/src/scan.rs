//! Date and money scanning over recognized text.

use std::sync::LazyLock;

use jiff::civil::Date;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shelfscan_core::DateMention;

// Numeric US dates (11/12/2025, 1/3/2025) and ISO dates (2025-11-12), in a
// single alternation so mentions come back in encounter order.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4})\b").expect("date regex")
});

// Currency amounts: `$` prefix, optional thousands separators, exactly two
// decimal places. The `$` requirement keeps bare quantities out.
static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s?(\d{1,3}(?:,\d{3})+\.\d{2}|\d+\.\d{2})").expect("money regex")
});

/// A currency amount found in recognized text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyMention {
    /// The substring as it appeared in the text.
    pub raw: String,
    /// The parsed amount. Always non-negative.
    pub parsed: f64,
}

/// Finds all date-shaped substrings that parse to valid calendar dates.
///
/// Mentions are returned in encounter order; syntactically date-shaped
/// substrings that fail calendar validation (e.g. `13/45/2025`) are omitted.
pub fn scan_dates(text: &str) -> Vec<DateMention> {
    DATE_RE
        .find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str();
            parse_date(raw).map(|parsed| DateMention {
                raw: raw.to_string(),
                parsed,
            })
        })
        .collect()
}

fn parse_date(raw: &str) -> Option<Date> {
    if raw.contains('-') {
        return raw.parse().ok();
    }
    let mut parts = raw.split('/');
    let month: i8 = parts.next()?.parse().ok()?;
    let day: i8 = parts.next()?.parse().ok()?;
    let year: i16 = parts.next()?.parse().ok()?;
    Date::new(year, month, day).ok()
}

/// Finds all currency-shaped substrings, sorted descending by amount.
///
/// The sort is stable, so equal amounts keep their encounter order. The
/// largest amount is conventionally the receipt total.
pub fn scan_money(text: &str) -> Vec<MoneyMention> {
    let mut mentions: Vec<MoneyMention> = MONEY_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str();
            let parsed: f64 = caps.get(1)?.as_str().replace(',', "").parse().ok()?;
            (parsed >= 0.0).then(|| MoneyMention {
                raw: raw.to_string(),
                parsed,
            })
        })
        .collect();
    mentions.sort_by(|a, b| b.parsed.total_cmp(&a.parsed));
    mentions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_come_back_in_encounter_order() {
        let text = "paid 11/12/2025, delivered 2025-11-20, ordered 11/01/2025";
        let dates = scan_dates(text);
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0].parsed, Date::constant(2025, 11, 12));
        assert_eq!(dates[1].parsed, Date::constant(2025, 11, 20));
        assert_eq!(dates[2].parsed, Date::constant(2025, 11, 1));
    }

    #[test]
    fn invalid_calendar_dates_are_omitted() {
        let dates = scan_dates("bogus 13/45/2025 and real 02/29/2024 and 2025-02-29");
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].raw, "02/29/2024");
    }

    #[test]
    fn money_sorts_descending_largest_first() {
        let prices = scan_money("item $4.99 tax $0.35 total $1,394.39");
        assert_eq!(prices.len(), 3);
        assert_eq!(prices[0].parsed, 1394.39);
        assert_eq!(prices[0].raw, "$1,394.39");
        assert_eq!(prices[2].parsed, 0.35);
    }

    #[test]
    fn equal_amounts_keep_encounter_order() {
        let prices = scan_money("a $5.00 b $9.00 c $5.00");
        assert_eq!(prices[0].parsed, 9.0);
        // Stable sort: the first-encountered $5.00 precedes the second.
        assert_eq!(prices[1].raw, "$5.00");
        let fives: Vec<_> = prices.iter().filter(|p| p.parsed == 5.0).collect();
        assert_eq!(fives.len(), 2);
    }

    #[test]
    fn bare_numbers_are_not_money() {
        assert!(scan_money("quantity 12.00 without a dollar sign").is_empty());
        assert_eq!(scan_money("$ 12.00 with a space").len(), 1);
    }
}
