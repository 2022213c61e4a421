//! Telegram Bot API transport using long polling.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::{ChatTransport, IncomingMessage, Sender};
use crate::config::BotConfig;
use crate::{HousebotError, Result};

/// Connect timeout for API requests.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Extra time allowed on top of the long-poll timeout before giving up.
const REQUEST_GRACE_SECS: u64 = 10;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
    from: Option<TgUser>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    id: i64,
    #[serde(default)]
    is_bot: bool,
    first_name: String,
    username: Option<String>,
}

impl Update {
    /// Convert to an incoming message, dropping non-text and bot messages.
    fn into_incoming(self) -> Option<IncomingMessage> {
        let message = self.message?;
        let from = message.from?;
        if from.is_bot {
            return None;
        }
        let text = message.text?;
        Some(IncomingMessage {
            chat_id: message.chat.id,
            sender: Sender {
                id: from.id,
                username: from.username,
                first_name: from.first_name,
            },
            text,
        })
    }
}

fn unwrap_response<T>(response: ApiResponse<T>, method: &str) -> Result<T> {
    if !response.ok {
        return Err(HousebotError::Transport(format!(
            "{method} rejected: {}",
            response.description.unwrap_or_else(|| "no description".to_string())
        )));
    }
    response
        .result
        .ok_or_else(|| HousebotError::Transport(format!("{method} returned no result")))
}

/// Telegram transport.
pub struct TelegramTransport {
    client: Client,
    endpoint: String,
    poll_timeout_secs: u64,
    offset: i64,
}

impl TelegramTransport {
    /// Create a transport from the bot configuration.
    pub fn new(config: &BotConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(HousebotError::Config("bot token is empty".to_string()));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(
                config.poll_timeout_secs + REQUEST_GRACE_SECS,
            ))
            .build()
            .map_err(|e| HousebotError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
            poll_timeout_secs: config.poll_timeout_secs,
            offset: 0,
        })
    }

    /// Bot username, used to tell our commands from other bots' in groups.
    pub async fn get_me(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/getMe", self.endpoint))
            .send()
            .await
            .map_err(|e| HousebotError::Transport(format!("getMe failed: {}", e.without_url())))?;

        let body: ApiResponse<TgUser> = response
            .json()
            .await
            .map_err(|e| HousebotError::Transport(format!("invalid getMe payload: {e}")))?;

        unwrap_response(body, "getMe")?
            .username
            .ok_or_else(|| HousebotError::Transport("getMe returned no username".to_string()))
    }

    /// Call `getUpdates`, confirming everything before the current offset.
    async fn get_updates(&self, timeout_secs: u64, limit: Option<u32>) -> Result<Vec<Update>> {
        let mut query = vec![
            ("offset", self.offset.to_string()),
            ("timeout", timeout_secs.to_string()),
        ];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/getUpdates", self.endpoint))
            .query(&query)
            .send()
            .await
            .map_err(|e| HousebotError::Transport(format!("getUpdates failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(HousebotError::Transport(format!(
                "getUpdates HTTP error: {}",
                response.status()
            )));
        }

        let body: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| HousebotError::Transport(format!("invalid getUpdates payload: {e}")))?;

        unwrap_response(body, "getUpdates")
    }

    /// Advance the offset past every update and keep the usable messages.
    fn accept_updates(&mut self, updates: Vec<Update>) -> Vec<IncomingMessage> {
        let mut messages = Vec::with_capacity(updates.len());
        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            let update_id = update.update_id;
            match update.into_incoming() {
                Some(message) => messages.push(message),
                None => debug!(update_id, "skipping update without user text"),
            }
        }
        messages
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn receive(&mut self) -> Result<Vec<IncomingMessage>> {
        let updates = self.get_updates(self.poll_timeout_secs, None).await?;
        Ok(self.accept_updates(updates))
    }

    async fn acknowledge(&mut self) -> Result<()> {
        if self.offset == 0 {
            return Ok(());
        }
        // Updates returned here stay unconfirmed and arrive again next start.
        self.get_updates(0, Some(1)).await?;
        debug!(offset = self.offset, "acknowledged handled updates");
        Ok(())
    }

    async fn reply(&self, chat_id: i64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/sendMessage", self.endpoint))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(|e| HousebotError::Transport(format!("sendMessage failed: {}", e.without_url())))?;

        let status = response.status();
        let body: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| HousebotError::Transport(format!("invalid sendMessage payload: {e}")))?;

        if !status.is_success() {
            warn!(chat_id, %status, "sendMessage returned an error status");
        }
        unwrap_response(body, "sendMessage").map(|_| ())
    }
}
