// Text rendering of analysis outcomes for the terminal and chat views
use crate::analyzer::ROLLING_WINDOW;
use crate::service::{AnalysisOutcome, AnomalyReport};
use crate::utils::truncate_chars;
use std::fmt::Write;

/// Notification bodies are cut to this many characters.
pub const ALERT_MAX_CHARS: usize = 256;

const HEADERS: [&str; 5] = ["Date", "Adj Close", "Volume", "Rolling Avg", "Volume Anomaly"];

pub fn status_line(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::NoData { ticker, .. } => {
            format!("Error: Unable to fetch data for {}.", ticker)
        }
        AnalysisOutcome::Report(report) if report.insufficient_history() => format!(
            "Not enough history for {}: {} days, need at least {}.",
            report.ticker, report.series_len, ROLLING_WINDOW
        ),
        AnalysisOutcome::Report(report) if !report.has_anomalies() => {
            format!("No anomalies detected for {}.", report.ticker)
        }
        AnalysisOutcome::Report(report) => format!(
            "Anomalies detected for {}: {}",
            report.ticker,
            report.anomaly_count()
        ),
    }
}

/// Fixed-width table of the anomalous days only.
pub fn render_table(report: &AnomalyReport) -> String {
    let rows: Vec<[String; 5]> = report
        .anomalies()
        .map(|r| {
            [
                r.date.to_string(),
                format!("{:.2}", r.adjusted_close),
                format!("{:.0}", r.volume as f64),
                format!("{:.0}", r.rolling_average),
                (if r.is_anomaly { "Yes" } else { "No" }).to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &width))| {
            // date left, numbers right
            if i == 0 {
                format!("{:<width$}", cell)
            } else {
                format!("{:>width$}", cell)
            }
        })
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

pub fn alert_title(ticker: &str) -> String {
    format!("Volume Anomaly Alert - {}", ticker)
}

pub fn alert_summary(report: &AnomalyReport) -> String {
    let message = format!(
        "{} anomaly(s) detected.\nSee the app for details.",
        report.anomaly_count()
    );
    truncate_chars(&message, ALERT_MAX_CHARS)
}
