// Provider-specific response parsing into a column frame
pub mod csv_export;
pub mod yahoo_chart;

use chrono::NaiveDate;

pub use csv_export::parse_csv_export;
pub use yahoo_chart::parse_chart_response;

/// Column label as the provider shaped it: a single level, or grouped by ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKey {
    Flat(String),
    Nested { ticker: String, field: String },
}

impl ColumnKey {
    pub fn flat(field: &str) -> Self {
        ColumnKey::Flat(field.to_string())
    }

    pub fn nested(ticker: &str, field: &str) -> Self {
        ColumnKey::Nested {
            ticker: ticker.to_string(),
            field: field.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub date: NaiveDate,
    /// One cell per entry in `RawFrame::columns`; `None` for missing values.
    pub values: Vec<Option<f64>>,
}

/// Unnormalized provider output: labelled columns over dated rows, any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<RawRow>,
}

const KNOWN_FIELDS: [&str; 6] = ["Open", "High", "Low", "Close", "Adj Close", "Volume"];

pub(crate) fn is_known_field(label: &str) -> bool {
    KNOWN_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(label.trim()))
}
