mod analyzer;
mod config;
mod fetcher;
mod model;
mod normalizer;
mod notifier;
mod parser;
mod report;
mod service;
mod storage;
mod utils;

use config::{load_config, AppConfig};
use fetcher::build_fetcher;
use model::AnomalyThreshold;
use notifier::TelegramNotifier;
use service::{AnalysisOutcome, AnalysisService};
use std::sync::Arc;
use storage::{FileTickerStore, TickerStore};
use tracing::{error, info, warn};
use utils::parse_threshold;

const USAGE: &str = "usage: volume-anomaly [TICKER] [THRESHOLD 1-10]\n       volume-anomaly --bot";

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config: AppConfig = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let default_threshold = match AnomalyThreshold::new(config.threshold) {
        Ok(t) => t,
        Err(e) => {
            error!("Config threshold error: {}", e);
            return;
        }
    };

    let fetcher = match build_fetcher(&config.source) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to initialize data source: {}", e);
            return;
        }
    };

    let store: Arc<dyn TickerStore> = Arc::new(FileTickerStore::new(&config.last_ticker_path));
    let service = Arc::new(AnalysisService::new(fetcher, store.clone(), &config.period));

    let notifier = match &config.telegram {
        Some(telegram) => match TelegramNotifier::new(telegram, service.clone(), default_threshold) {
            Ok(n) => Some(n),
            Err(e) => {
                warn!("Telegram disabled: {}", e);
                None
            }
        },
        None => None,
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--bot") {
        run_bot(notifier).await;
        return;
    }

    let ticker = match args.first().cloned().or_else(|| store.load_last_ticker()) {
        Some(t) => t,
        None => {
            error!("No ticker given and no last ticker saved");
            eprintln!("{}", USAGE);
            return;
        }
    };

    let threshold = match args.get(1) {
        Some(raw) => match parse_threshold(raw) {
            Ok(t) => t,
            Err(e) => {
                error!("{}", e);
                eprintln!("{}", USAGE);
                return;
            }
        },
        None => default_threshold,
    };

    let outcome = match service.analyze(&ticker, threshold).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    println!("{}", report::status_line(&outcome));
    if let AnalysisOutcome::Report(report) = &outcome {
        if report.has_anomalies() {
            println!("{}", report::render_table(report));
            if let Some(notifier) = &notifier {
                if let Err(e) = notifier.notify_anomalies(report).await {
                    warn!("Anomaly alert failed: {}", e);
                }
            }
        }
    }
    info!("Finished analysis for {}", ticker.trim().to_uppercase());
}

/// Serves Telegram commands until the process is stopped.
async fn run_bot(notifier: Option<TelegramNotifier>) {
    let Some(notifier) = notifier else {
        error!("--bot needs a \"telegram\" section in config.json");
        return;
    };

    if let Err(e) = notifier.set_my_commands().await {
        warn!("Failed to register bot commands: {}", e);
    }
    info!("Sending startup message...");
    if let Err(e) = notifier.notify_text("🚀 Volume anomaly bot started!").await {
        warn!("Startup notification failed: {:?}", e);
    }

    tokio::select! {
        _ = notifier.listen_for_commands() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }
}
