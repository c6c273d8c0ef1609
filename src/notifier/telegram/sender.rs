// notifier/telegram/sender.rs

use crate::model::NotifyError;
use crate::notifier::telegram::TelegramNotifier;
use crate::report::{alert_summary, alert_title};
use crate::service::AnomalyReport;
use crate::utils::truncate_chars;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Telegram rejects longer message texts.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Sends a plain text message to the configured chat.
pub async fn send_text(notifier: &TelegramNotifier, text: &str) -> Result<(), NotifyError> {
    let params = [
        ("chat_id", notifier.chat_id.to_string()),
        ("text", truncate_chars(text, MAX_MESSAGE_CHARS)),
    ];
    let response = match timeout(
        Duration::from_secs(10),
        notifier
            .client
            .post(notifier.method_url("sendMessage"))
            .form(&params)
            .send(),
    )
    .await
    {
        Ok(Ok(resp)) => resp,
        Ok(Err(e)) => {
            warn!("❌ Telegram send() failed: {:?}", e);
            return Err(NotifyError::ApiError(format!("Send failed: {}", e)));
        }
        Err(_) => {
            warn!("⏳ Telegram send() timed out");
            return Err(NotifyError::Unreachable);
        }
    };
    let status = response.status();
    let body = response.text().await.unwrap_or_else(|_| "unknown".into());
    if !status.is_success() {
        warn!("❌ Telegram API responded [{}]: {}", status, body);
        return Err(NotifyError::Unreachable);
    }
    info!("✅ Telegram message sent [{}]", status);
    Ok(())
}

pub fn alert_message(report: &AnomalyReport) -> String {
    format!("{}\n\n{}", alert_title(&report.ticker), alert_summary(report))
}

/// Sends the short anomaly alert for a finished analysis.
pub async fn send_anomaly_alert(
    notifier: &TelegramNotifier,
    report: &AnomalyReport,
) -> Result<(), NotifyError> {
    let message = alert_message(report);
    info!("📤 Sending anomaly alert for {}", report.ticker);
    send_text(notifier, &message).await
}
