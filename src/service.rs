use crate::analyzer::{detect, ROLLING_WINDOW};
use crate::fetcher::DataFetcher;
use crate::model::{AnomalyRecord, AnomalyThreshold, InputError};
use crate::storage::TickerStore;
use crate::utils::normalize_ticker;
use std::sync::Arc;
use tracing::{info, warn};

/// Detector output plus the context a view needs to interpret it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyReport {
    pub ticker: String,
    pub threshold: AnomalyThreshold,
    /// Length of the fetched series, before the rolling window dropped its prefix.
    pub series_len: usize,
    pub records: Vec<AnomalyRecord>,
}

impl AnomalyReport {
    pub fn anomalies(&self) -> impl Iterator<Item = &AnomalyRecord> {
        self.records.iter().filter(|r| r.is_anomaly)
    }

    pub fn anomaly_count(&self) -> usize {
        self.anomalies().count()
    }

    pub fn has_anomalies(&self) -> bool {
        self.anomalies().next().is_some()
    }

    /// True when the series was too short for any rolling average.
    pub fn insufficient_history(&self) -> bool {
        self.series_len < ROLLING_WINDOW
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Fetch failed or returned nothing; `reason` is the diagnostic.
    NoData { ticker: String, reason: String },
    Report(AnomalyReport),
}

/// Runs one analysis for a caller: validate, remember the ticker, fetch, detect.
pub struct AnalysisService {
    fetcher: Arc<dyn DataFetcher>,
    store: Arc<dyn TickerStore>,
    period: String,
}

impl AnalysisService {
    pub fn new(fetcher: Arc<dyn DataFetcher>, store: Arc<dyn TickerStore>, period: &str) -> Self {
        Self {
            fetcher,
            store,
            period: period.to_string(),
        }
    }

    pub fn last_ticker(&self) -> Option<String> {
        self.store.load_last_ticker()
    }

    pub fn remember_ticker(&self, ticker: &str) {
        if let Err(e) = self.store.save_last_ticker(ticker) {
            warn!("Failed to save last ticker: {}", e);
        }
    }

    pub async fn analyze(
        &self,
        raw_ticker: &str,
        threshold: AnomalyThreshold,
    ) -> Result<AnalysisOutcome, InputError> {
        let ticker = normalize_ticker(raw_ticker)?;
        self.remember_ticker(&ticker);

        info!("Fetching data for {}...", ticker);
        let series = match self.fetcher.fetch(&ticker, &self.period).await {
            Ok(series) => series,
            Err(e) => {
                warn!("Error fetching data for {}: {}", ticker, e);
                return Ok(AnalysisOutcome::NoData {
                    ticker,
                    reason: e.to_string(),
                });
            }
        };

        if series.is_empty() {
            info!("No data available for {}", ticker);
            return Ok(AnalysisOutcome::NoData {
                ticker,
                reason: "no rows returned".into(),
            });
        }

        let records = detect(&series, threshold.multiplier());
        let report = AnomalyReport {
            ticker,
            threshold,
            series_len: series.len(),
            records,
        };
        info!(
            "Detected {} anomalies for {} over {} days (threshold {}x)",
            report.anomaly_count(),
            report.ticker,
            report.series_len,
            report.threshold
        );
        Ok(AnalysisOutcome::Report(report))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{FetchError, TimeSeries, TimeSeriesPoint};
    use crate::storage::ticker_store::memory::MemoryTickerStore;
    use chrono::{Duration, NaiveDate};
    use std::collections::HashMap;

    /// Serves fixed series per ticker; anything else is not found.
    pub(crate) struct StaticFetcher {
        pub series: HashMap<String, TimeSeries>,
    }

    #[async_trait::async_trait]
    impl DataFetcher for StaticFetcher {
        async fn fetch(&self, ticker: &str, _period: &str) -> Result<TimeSeries, FetchError> {
            self.series
                .get(ticker)
                .cloned()
                .ok_or_else(|| FetchError::TickerNotFound(ticker.to_string()))
        }
    }

    pub(crate) fn series_with_spike(len: usize, spike_at: usize) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        TimeSeries::new(
            (0..len)
                .map(|i| TimeSeriesPoint {
                    date: start + Duration::days(i as i64),
                    adjusted_close: 10.0,
                    volume: if i == spike_at { 5000 } else { 1000 },
                })
                .collect(),
        )
    }

    pub(crate) fn service_with(store: Arc<MemoryTickerStore>) -> AnalysisService {
        let mut series = HashMap::new();
        series.insert("SPIKE".to_string(), series_with_spike(25, 21));
        series.insert("SHORT".to_string(), series_with_spike(10, 99));
        series.insert("EMPTY".to_string(), TimeSeries::default());
        AnalysisService::new(Arc::new(StaticFetcher { series }), store, "1y")
    }

    #[tokio::test]
    async fn report_for_known_ticker() {
        let store = Arc::new(MemoryTickerStore::default());
        let service = service_with(store.clone());

        let outcome = service.analyze(" spike ", AnomalyThreshold::default()).await.unwrap();
        let AnalysisOutcome::Report(report) = outcome else {
            panic!("expected a report");
        };
        assert_eq!(report.ticker, "SPIKE");
        assert_eq!(report.series_len, 25);
        assert_eq!(report.records.len(), 6);
        assert_eq!(report.anomaly_count(), 1);
        assert!(report.has_anomalies());
        assert!(!report.insufficient_history());
        assert_eq!(store.load_last_ticker(), Some("SPIKE".into()));
    }

    #[tokio::test]
    async fn unknown_ticker_is_no_data() {
        let service = service_with(Arc::new(MemoryTickerStore::default()));
        let outcome = service.analyze("ZZZZ", AnomalyThreshold::default()).await.unwrap();
        assert_eq!(
            outcome,
            AnalysisOutcome::NoData {
                ticker: "ZZZZ".into(),
                reason: "ticker not found: ZZZZ".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_series_is_no_data() {
        let service = service_with(Arc::new(MemoryTickerStore::default()));
        let outcome = service.analyze("EMPTY", AnomalyThreshold::default()).await.unwrap();
        assert!(matches!(outcome, AnalysisOutcome::NoData { .. }));
    }

    #[tokio::test]
    async fn short_series_reports_insufficient_history() {
        let service = service_with(Arc::new(MemoryTickerStore::default()));
        let outcome = service.analyze("SHORT", AnomalyThreshold::default()).await.unwrap();
        let AnalysisOutcome::Report(report) = outcome else {
            panic!("expected a report");
        };
        assert!(report.records.is_empty());
        assert!(report.insufficient_history());
        assert!(!report.has_anomalies());
    }

    #[tokio::test]
    async fn blank_ticker_is_an_input_error() {
        let store = Arc::new(MemoryTickerStore::with("AAPL"));
        let service = service_with(store.clone());
        let result = service.analyze("   ", AnomalyThreshold::default()).await;
        assert_eq!(result, Err(InputError::EmptyTicker));
        assert_eq!(store.load_last_ticker(), Some("AAPL".into()));
    }

    #[tokio::test]
    async fn higher_threshold_hides_the_spike() {
        let service = service_with(Arc::new(MemoryTickerStore::default()));
        let outcome = service
            .analyze("SPIKE", AnomalyThreshold::new(5).unwrap())
            .await
            .unwrap();
        let AnalysisOutcome::Report(report) = outcome else {
            panic!("expected a report");
        };
        assert_eq!(report.anomaly_count(), 0);
        assert_eq!(report.records.len(), 6);
    }
}
