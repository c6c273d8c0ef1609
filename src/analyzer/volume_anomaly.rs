use crate::analyzer::market_indicators::rolling_mean;
use crate::model::{AnomalyRecord, TimeSeries};

/// Number of trailing observations (current day included) in the rolling average.
pub const ROLLING_WINDOW: usize = 20;

/// Flags days whose volume is strictly greater than `rolling average * threshold`.
///
/// Every day with a defined rolling average is returned, anomalous or not, in
/// chronological order. The first `ROLLING_WINDOW - 1` days have no average and
/// never appear, so a series shorter than the window yields an empty vector.
/// The threshold is taken as is; range checks belong to the caller.
pub fn detect(series: &TimeSeries, threshold: f64) -> Vec<AnomalyRecord> {
    let points = series.points();
    let volumes: Vec<u64> = points.iter().map(|p| p.volume).collect();
    let averages = rolling_mean(&volumes, ROLLING_WINDOW);

    points
        .iter()
        .skip(ROLLING_WINDOW - 1)
        .zip(averages)
        .map(|(point, rolling_average)| AnomalyRecord {
            date: point.date,
            adjusted_close: point.adjusted_close,
            volume: point.volume,
            rolling_average,
            is_anomaly: point.volume as f64 > rolling_average * threshold,
        })
        .collect()
}
