// notifier/telegram/listener.rs

use crate::notifier::telegram::command_handler::handle_command;
use crate::notifier::telegram::TelegramNotifier;
use serde::Deserialize;
use std::sync::atomic::Ordering;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct TelegramApiResponse {
    result: Vec<TelegramUpdate>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    chat: TelegramChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

/// Polls for Telegram updates and processes incoming commands from the configured chat.
pub async fn listen_for_commands(notifier: &TelegramNotifier) {
    let url = notifier.method_url("getUpdates");
    info!("▶️ Listening for Telegram commands...");
    loop {
        let current_offset = notifier.offset.load(Ordering::SeqCst);
        let response = notifier
            .client
            .get(&url)
            .query(&[("offset", current_offset.to_string())])
            .send()
            .await;
        match response {
            Ok(resp) => match resp.json::<TelegramApiResponse>().await {
                Ok(api_response) => {
                    for update in api_response.result {
                        if let Some(message) = &update.message {
                            match message.text.as_deref() {
                                Some(text) if message.chat.id == notifier.chat_id => {
                                    handle_command(text, notifier).await;
                                }
                                Some(_) => debug!("Ignoring message from chat {}", message.chat.id),
                                None => {}
                            }
                        }
                        notifier.offset.store(update.update_id + 1, Ordering::SeqCst);
                    }
                }
                Err(e) => warn!("Failed to decode getUpdates response: {:?}", e),
            },
            Err(e) => warn!("getUpdates failed: {:?}", e),
        }
        sleep(notifier.poll_interval).await;
    }
}
