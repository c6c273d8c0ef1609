// notifier/telegram/command_handler.rs

use crate::model::InputError;
use crate::notifier::telegram::TelegramNotifier;
use crate::report::{render_table, status_line};
use crate::service::AnalysisOutcome;
use crate::utils::parse_threshold;
use std::time::Duration;
use tracing::{info, warn};

const HELP: &str = "📋 Available commands:\n\
    /ping — check connection\n\
    /help — command list\n\
    /analyze TICKER [THRESHOLD] — look for volume anomalies\n\
    /threshold [N] — show or set the threshold (1-10)\n\
    /last — last analyzed ticker\n\
    /uptime — service uptime";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Help,
    Analyze {
        ticker: Option<String>,
        threshold: Option<String>,
    },
    Threshold(Option<String>),
    Last,
    Uptime,
    Unknown(String),
}

/// Splits a message into a command and its arguments. `/cmd@BotName` is accepted.
pub fn parse_command(text: &str) -> Command {
    let mut parts = text.split_whitespace();
    let head = parts.next().unwrap_or("");
    let name = head.split('@').next().unwrap_or(head).to_lowercase();
    let mut arg = || parts.next().map(str::to_string);

    match name.as_str() {
        "/ping" => Command::Ping,
        "/help" | "/start" => Command::Help,
        "/analyze" => {
            let ticker = arg();
            let threshold = arg();
            Command::Analyze { ticker, threshold }
        }
        "/threshold" => Command::Threshold(arg()),
        "/last" => Command::Last,
        "/uptime" => Command::Uptime,
        _ => Command::Unknown(text.trim().to_string()),
    }
}

pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!(
        "⏱ Uptime: {:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

/// Text reply for a finished analysis: status line plus the anomaly table.
pub fn analysis_reply(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Report(report) if report.has_anomalies() => {
            format!("🚨 {}\n\n{}", status_line(outcome), render_table(report))
        }
        AnalysisOutcome::Report(_) => format!("✅ {}", status_line(outcome)),
        AnalysisOutcome::NoData { reason, .. } => {
            format!("❌ {}\n{}", status_line(outcome), reason)
        }
    }
}

/// Handles an incoming command and replies to the configured chat.
pub async fn handle_command(command_text: &str, notifier: &TelegramNotifier) {
    info!("Handling command: {}", command_text);
    let reply = match parse_command(command_text) {
        Command::Ping => "✅ I am online!".to_string(),
        Command::Help => HELP.to_string(),
        Command::Uptime => format_uptime(notifier.start_time.elapsed()),
        Command::Last => match notifier.service.last_ticker() {
            Some(ticker) => format!("🕵️ Last ticker: {}", ticker),
            None => "📭 No ticker analyzed yet.".to_string(),
        },
        Command::Threshold(None) => format!("🎚 Threshold: {}", notifier.current_threshold()),
        Command::Threshold(Some(raw)) => match parse_threshold(&raw) {
            Ok(threshold) => {
                notifier.set_threshold(threshold);
                format!("🎚 Threshold set to {}", threshold)
            }
            Err(e) => format!("⚠️ {}", e),
        },
        Command::Analyze { ticker, threshold } => {
            analyze(notifier, ticker, threshold).await
        }
        Command::Unknown(_) => "🤖 Unknown command. Type /help for a list of commands.".to_string(),
    };

    if let Err(e) = notifier.notify_text(&reply).await {
        warn!("Reply to '{}' failed: {:?}", command_text, e);
    }
}

async fn analyze(
    notifier: &TelegramNotifier,
    ticker: Option<String>,
    threshold: Option<String>,
) -> String {
    let threshold = match threshold.as_deref().map(parse_threshold) {
        Some(Ok(threshold)) => threshold,
        Some(Err(e)) => return format!("⚠️ {}", e),
        None => notifier.current_threshold(),
    };
    let Some(ticker) = ticker.or_else(|| notifier.service.last_ticker()) else {
        return format!("⚠️ {}", InputError::EmptyTicker);
    };

    match notifier.service.analyze(&ticker, threshold).await {
        Ok(outcome) => analysis_reply(&outcome),
        Err(e) => format!("⚠️ {}", e),
    }
}
