//! Polling loop that ties the transport to the command router.

use std::future::Future;

use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use super::router::CommandRouter;
use crate::config::HouseholdConfig;
use crate::db::Database;
use crate::transport::{ChatTransport, IncomingMessage};
use crate::Result;

/// Pause after a failed receive before polling again.
const RECEIVE_BACKOFF_SECS: u64 = 5;

/// Household bot.
pub struct Bot<T: ChatTransport> {
    transport: T,
    db: Database,
    household: HouseholdConfig,
    username: Option<String>,
}

impl<T: ChatTransport> Bot<T> {
    /// Create a new bot.
    pub fn new(transport: T, db: Database, household: HouseholdConfig) -> Self {
        Self {
            transport,
            db,
            household,
            username: None,
        }
    }

    /// Set the bot's own username so commands for other bots are ignored.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Receive one batch and answer every command in it.
    ///
    /// Returns the number of replies delivered.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let messages = self.transport.receive().await?;
        Ok(self.handle_batch(messages).await)
    }

    /// Answer every command in a received batch.
    ///
    /// A failed reply is logged and the rest of the batch is still handled.
    async fn handle_batch(&self, messages: Vec<IncomingMessage>) -> usize {
        if messages.is_empty() {
            return 0;
        }
        debug!("Received {} message(s)", messages.len());

        let mut router = CommandRouter::new(&self.db, &self.household);
        if let Some(username) = self.username.as_deref() {
            router = router.with_bot_username(username);
        }
        let mut delivered = 0;

        for message in messages {
            let Some(reply) = router.handle_text(&message.sender, &message.text).await else {
                continue;
            };
            match self.transport.reply(message.chat_id, &reply).await {
                Ok(()) => delivered += 1,
                Err(e) => error!("Failed to send reply to chat {}: {}", message.chat_id, e),
            }
        }

        delivered
    }

    /// Poll until `shutdown` completes.
    ///
    /// Shutdown only interrupts waiting for messages; a batch that has been
    /// received is always handled to the end.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!("Bot started");
        tokio::pin!(shutdown);

        loop {
            let received = tokio::select! {
                _ = &mut shutdown => break,
                received = self.transport.receive() => received,
            };

            match received {
                Ok(messages) => {
                    self.handle_batch(messages).await;
                }
                Err(e) => {
                    warn!(
                        "Failed to receive messages: {} (retrying in {}s)",
                        e, RECEIVE_BACKOFF_SECS
                    );
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = sleep(Duration::from_secs(RECEIVE_BACKOFF_SECS)) => {}
                    }
                }
            }
        }

        if let Err(e) = self.transport.acknowledge().await {
            warn!("Failed to acknowledge handled messages: {}", e);
        }
        info!("Bot stopped");
    }
}
