use crate::model::{FetchError, TimeSeries};

/// Source of daily bars for a single ticker.
///
/// Implementations return the normalized series or a `FetchError`, which
/// callers treat as "data unavailable". They must not panic on bad input.
#[async_trait::async_trait]
pub trait DataFetcher: Send + Sync {
    async fn fetch(&self, ticker: &str, period: &str) -> Result<TimeSeries, FetchError>;
}
