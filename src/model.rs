// Core structs: TimeSeries, AnomalyRecord, AnomalyThreshold and the error types
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// One trading day: the two signals the detector works with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub adjusted_close: f64,
    pub volume: u64,
}

/// Daily series, strictly increasing by date.
///
/// Construction sorts the points and collapses duplicate dates (the last
/// occurrence wins), so every `TimeSeries` holds the ordering invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    pub fn new(mut points: Vec<TimeSeriesPoint>) -> Self {
        // stable sort keeps input order among equal dates, so the last one is the newest
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<TimeSeriesPoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Result of the detector for a single day with a defined rolling average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub date: NaiveDate,
    pub adjusted_close: f64,
    pub volume: u64,
    pub rolling_average: f64,
    pub is_anomaly: bool,
}

/// Threshold multiplier as picked by a user: an integer in `[1, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AnomalyThreshold(u8);

impl AnomalyThreshold {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, InputError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InputError::ThresholdOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn multiplier(self) -> f64 {
        f64::from(self.0)
    }
}

impl Default for AnomalyThreshold {
    fn default() -> Self {
        Self(2)
    }
}

impl std::fmt::Display for AnomalyThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every variant means "data unavailable" for the requested ticker.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("ticker not found: {0}")]
    TickerNotFound(String),
    #[error("'{column}' column is missing for {ticker}")]
    MissingColumn { ticker: String, column: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<csv::Error> for FetchError {
    fn from(err: csv::Error) -> Self {
        FetchError::Malformed(format!("CSV error: {}", err))
    }
}

/// Caller-side validation failures, raised before the core is called.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a valid stock ticker.")]
    EmptyTicker,
    #[error("threshold {0} is outside the range 1-10")]
    ThresholdOutOfRange(u8),
    #[error("threshold '{0}' is not a number")]
    InvalidThreshold(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("notification endpoint unreachable")]
    Unreachable,
}
