use crate::fetcher::period::Period;
use crate::fetcher::traits::DataFetcher;
use crate::model::{FetchError, TimeSeries};
use crate::normalizer::normalize;
use crate::parser::parse_chart_response;
use crate::utils::normalize_ticker;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Daily bars from the Yahoo Finance chart endpoint.
pub struct YahooFetcher {
    client: Client,
    base_url: String,
}

impl YahooFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) VolumeAnomalyBot/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, ticker: &str) -> String {
        format!("{}/{}", self.base_url, ticker)
    }
}

#[async_trait::async_trait]
impl DataFetcher for YahooFetcher {
    async fn fetch(&self, ticker: &str, period: &str) -> Result<TimeSeries, FetchError> {
        let ticker = normalize_ticker(ticker).map_err(|e| FetchError::InvalidRequest(e.to_string()))?;
        let period: Period = period.parse()?;
        let url = self.build_url(&ticker);

        info!("Fetching {} ({}) from {}", ticker, period.as_str(), url);
        let response = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // 404 carries a chart.error body naming the failure
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            warn!("❌ Yahoo responded [{}] for {}", status, ticker);
            return Err(FetchError::Network(format!("HTTP {}", status)));
        }

        let frame = match parse_chart_response(&body, &ticker) {
            Err(FetchError::Malformed(_)) if status == StatusCode::NOT_FOUND => {
                return Err(FetchError::TickerNotFound(ticker));
            }
            other => other?,
        };
        debug!("Columns for {}: {:?}", ticker, frame.columns);

        let series = normalize(&frame, &ticker)?;
        info!("Fetched {} daily points for {}", series.len(), ticker);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_has_no_double_slash() {
        let fetcher = YahooFetcher::new("https://example.test/chart/", Duration::from_secs(1)).unwrap();
        assert_eq!(fetcher.build_url("AAPL"), "https://example.test/chart/AAPL");
    }

    #[tokio::test]
    async fn empty_ticker_is_rejected_before_any_request() {
        let fetcher = YahooFetcher::new(DEFAULT_BASE_URL, Duration::from_secs(1)).unwrap();
        assert!(matches!(
            fetcher.fetch("  ", "1y").await,
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn unknown_period_is_rejected_before_any_request() {
        let fetcher = YahooFetcher::new(DEFAULT_BASE_URL, Duration::from_secs(1)).unwrap();
        assert!(matches!(
            fetcher.fetch("AAPL", "3w").await,
            Err(FetchError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_data_unavailable() {
        // port 9 on localhost: connection refused, no network needed
        let fetcher = YahooFetcher::new("http://127.0.0.1:9/chart", Duration::from_secs(2)).unwrap();
        let result = fetcher.fetch("AAPL", "1y").await;
        assert!(matches!(
            result,
            Err(FetchError::Network(_)) | Err(FetchError::Timeout)
        ));
    }
}
