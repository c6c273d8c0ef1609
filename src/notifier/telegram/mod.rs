pub mod command_handler;
pub mod listener;
pub mod sender;

use crate::config::TelegramConfig;
use crate::model::{AnomalyThreshold, NotifyError};
use crate::service::{AnalysisService, AnomalyReport};
use reqwest::Client;
use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const API_BASE: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    pub bot_token: String,
    pub chat_id: i64,
    pub client: Client,
    pub offset: Arc<AtomicI64>,
    pub service: Arc<AnalysisService>,
    pub start_time: Instant,
    pub poll_interval: Duration,
    api_base: String,
    threshold: AtomicU8,
}

impl TelegramNotifier {
    pub fn new(
        config: &TelegramConfig,
        service: Arc<AnalysisService>,
        threshold: AnomalyThreshold,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::ApiError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id,
            client,
            offset: Arc::new(AtomicI64::new(0)),
            service,
            start_time: Instant::now(),
            poll_interval: Duration::from_secs(config.poll_interval_seconds.max(1)),
            api_base: API_BASE.to_string(),
            threshold: AtomicU8::new(threshold.value()),
        })
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    /// Threshold used by `/analyze` when none is given.
    pub fn current_threshold(&self) -> AnomalyThreshold {
        AnomalyThreshold::new(self.threshold.load(Ordering::SeqCst)).unwrap_or_default()
    }

    pub fn set_threshold(&self, threshold: AnomalyThreshold) {
        self.threshold.store(threshold.value(), Ordering::SeqCst);
    }

    pub async fn notify_text(&self, text: &str) -> Result<(), NotifyError> {
        sender::send_text(self, text).await
    }

    pub async fn notify_anomalies(&self, report: &AnomalyReport) -> Result<(), NotifyError> {
        sender::send_anomaly_alert(self, report).await
    }

    pub async fn listen_for_commands(&self) {
        listener::listen_for_commands(self).await;
    }

    pub async fn set_my_commands(&self) -> Result<(), NotifyError> {
        let commands = serde_json::json!({
            "commands": [
                { "command": "ping", "description": "Check connection" },
                { "command": "help", "description": "Command list" },
                { "command": "analyze", "description": "Analyze TICKER [THRESHOLD]" },
                { "command": "threshold", "description": "Show or set the threshold" },
                { "command": "last", "description": "Last analyzed ticker" },
                { "command": "uptime", "description": "Service uptime" }
            ]
        });
        self.client
            .post(self.method_url("setMyCommands"))
            .json(&commands)
            .send()
            .await
            .map_err(|e| NotifyError::ApiError(e.to_string()))?;
        Ok(())
    }
}
