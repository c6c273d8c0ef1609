// Utility functions
use crate::model::{AnomalyThreshold, InputError};
use chrono::NaiveDate;

/// Reads a calendar date from `YYYY-MM-DD`, ignoring any trailing time part.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(text.get(..10)?, "%Y-%m-%d").ok())
}

/// Trims and upper-cases a ticker; symbols are case-insensitive.
pub fn normalize_ticker(raw: &str) -> Result<String, InputError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        Err(InputError::EmptyTicker)
    } else {
        Ok(ticker)
    }
}

pub fn parse_threshold(raw: &str) -> Result<AnomalyThreshold, InputError> {
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|_| InputError::InvalidThreshold(raw.trim().to_string()))?;
    AnomalyThreshold::new(value)
}

/// Cuts `text` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_with_and_without_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29);
        assert_eq!(parse_date("2024-02-29"), expected);
        assert_eq!(parse_date(" 2024-02-29 "), expected);
        assert_eq!(parse_date("2024-02-29 00:00:00-05:00"), expected);
        assert_eq!(parse_date("Date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn ticker_normalization() {
        assert_eq!(normalize_ticker("  aapl "), Ok("AAPL".into()));
        assert_eq!(normalize_ticker("brk-b"), Ok("BRK-B".into()));
        assert_eq!(normalize_ticker("   "), Err(InputError::EmptyTicker));
    }

    #[test]
    fn threshold_parsing() {
        assert_eq!(parse_threshold("3").unwrap().value(), 3);
        assert_eq!(parse_threshold("0"), Err(InputError::ThresholdOutOfRange(0)));
        assert_eq!(
            parse_threshold("two"),
            Err(InputError::InvalidThreshold("two".into()))
        );
        assert!(parse_threshold("300").is_err());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("äöü", 2), "äö");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
