pub mod csv_source;
pub mod period;
pub mod traits;
pub mod yahoo;

use crate::config::SourceConfig;
use crate::model::FetchError;
use std::sync::Arc;
use std::time::Duration;

pub use csv_source::CsvFetcher;
pub use period::Period;
pub use traits::DataFetcher;
pub use yahoo::YahooFetcher;

/// Builds the fetcher selected in the configuration.
pub fn build_fetcher(source: &SourceConfig) -> Result<Arc<dyn DataFetcher>, FetchError> {
    match source {
        SourceConfig::Yahoo {
            base_url,
            timeout_seconds,
        } => Ok(Arc::new(YahooFetcher::new(
            base_url,
            Duration::from_secs(*timeout_seconds),
        )?)),
        SourceConfig::Csv { dir } => Ok(Arc::new(CsvFetcher::new(dir))),
    }
}
