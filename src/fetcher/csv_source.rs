use crate::fetcher::period::Period;
use crate::fetcher::traits::DataFetcher;
use crate::model::{FetchError, TimeSeries};
use crate::normalizer::normalize;
use crate::parser::parse_csv_export;
use crate::utils::normalize_ticker;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::info;

/// Daily bars from `<dir>/<TICKER>.csv` exports.
///
/// The lookback is measured back from the newest row in the file, not from
/// today, so old exports still give a full period.
pub struct CsvFetcher {
    dir: PathBuf,
}

impl CsvFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }
}

#[async_trait::async_trait]
impl DataFetcher for CsvFetcher {
    async fn fetch(&self, ticker: &str, period: &str) -> Result<TimeSeries, FetchError> {
        let ticker = normalize_ticker(ticker).map_err(|e| FetchError::InvalidRequest(e.to_string()))?;
        let period: Period = period.parse()?;
        let path = self.path_for(&ticker);

        info!("Reading {} ({}) from {}", ticker, period.as_str(), path.display());
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::TickerNotFound(ticker.clone()),
            _ => FetchError::Io(format!("{}: {}", path.display(), e)),
        })?;

        let frame = parse_csv_export(&text)?;
        let series = normalize(&frame, &ticker)?;

        let cutoff = series.last_date().and_then(|end| period.cutoff(end));
        let series = match cutoff {
            Some(cutoff) => TimeSeries::new(
                series
                    .points()
                    .iter()
                    .filter(|p| p.date > cutoff)
                    .cloned()
                    .collect(),
            ),
            None => series,
        };

        info!(
            "Loaded {} daily points for {} ({:?} to {:?})",
            series.len(),
            ticker,
            series.first_date(),
            series.last_date()
        );
        Ok(series)
    }
}
