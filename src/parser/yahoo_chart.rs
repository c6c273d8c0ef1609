// Yahoo Finance chart endpoint: JSON into a flat RawFrame
use crate::model::FetchError;
use crate::parser::{ColumnKey, RawFrame, RawRow};
use chrono::DateTime;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Parses a chart response body. The `adjclose` indicator is only emitted as a
/// column when the provider sent it, so a missing one surfaces later as a
/// missing column rather than being silently replaced by `close`.
pub fn parse_chart_response(body: &str, ticker: &str) -> Result<RawFrame, FetchError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if let Some(error) = response.chart.error {
        return Err(match error.code.as_str() {
            "Not Found" => FetchError::TickerNotFound(ticker.to_string()),
            "Bad Request" => FetchError::InvalidRequest(error.description),
            _ => FetchError::Malformed(format!("{}: {}", error.code, error.description)),
        });
    }

    let data = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| FetchError::TickerNotFound(ticker.to_string()))?;

    // a valid symbol with no trading days in range
    let Some(timestamps) = data.timestamp else {
        return Ok(RawFrame::default());
    };

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = data
        .indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .map(|a| a.adjclose);

    let mut columns = vec![
        ColumnKey::flat("Open"),
        ColumnKey::flat("High"),
        ColumnKey::flat("Low"),
        ColumnKey::flat("Close"),
        ColumnKey::flat("Volume"),
    ];
    if adjclose.is_some() {
        columns.push(ColumnKey::flat("Adj Close"));
    }

    let cell = |values: &Vec<Option<f64>>, i: usize| values.get(i).copied().flatten();

    let mut rows = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        // exchange-local calendar day
        let Some(moment) = DateTime::from_timestamp(ts + data.meta.gmtoffset, 0) else {
            return Err(FetchError::Malformed(format!("timestamp out of range: {}", ts)));
        };
        let mut values = vec![
            cell(&quote.open, i),
            cell(&quote.high, i),
            cell(&quote.low, i),
            cell(&quote.close, i),
            cell(&quote.volume, i),
        ];
        if let Some(adj) = &adjclose {
            values.push(cell(adj, i));
        }
        rows.push(RawRow {
            date: moment.date_naive(),
            values,
        });
    }

    Ok(RawFrame { columns, rows })
}
