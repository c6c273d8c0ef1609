use crate::model::{FetchError, TimeSeries, TimeSeriesPoint};
use crate::parser::{ColumnKey, RawFrame};
use tracing::debug;

pub const ADJ_CLOSE: &str = "Adj Close";
pub const VOLUME: &str = "Volume";

/// Reduces a provider frame to the adjusted close and volume of `ticker`.
///
/// Flat frames are read by field name; grouped frames by `(ticker, field)`.
/// Rows missing either signal, or carrying a negative volume, are dropped.
/// The result is sorted by date with one point per date.
pub fn normalize(frame: &RawFrame, ticker: &str) -> Result<TimeSeries, FetchError> {
    let price_idx = find_column(frame, ticker, ADJ_CLOSE)?;
    let volume_idx = find_column(frame, ticker, VOLUME)?;

    let mut points = Vec::with_capacity(frame.rows.len());
    for row in &frame.rows {
        let price = row.values.get(price_idx).copied().flatten();
        let volume = row.values.get(volume_idx).copied().flatten();
        match (price, volume) {
            (Some(price), Some(volume)) if price.is_finite() && volume.is_finite() && volume >= 0.0 => {
                points.push(TimeSeriesPoint {
                    date: row.date,
                    adjusted_close: price,
                    volume: volume.round() as u64,
                });
            }
            _ => debug!("Skipping incomplete row for {} on {}", ticker, row.date),
        }
    }

    Ok(TimeSeries::new(points))
}

fn find_column(frame: &RawFrame, ticker: &str, field: &str) -> Result<usize, FetchError> {
    frame
        .columns
        .iter()
        .position(|key| match key {
            ColumnKey::Flat(name) => name.eq_ignore_ascii_case(field),
            ColumnKey::Nested { ticker: t, field: f } => {
                t.eq_ignore_ascii_case(ticker) && f.eq_ignore_ascii_case(field)
            }
        })
        .ok_or_else(|| FetchError::MissingColumn {
            ticker: ticker.to_string(),
            column: field.to_string(),
        })
}
