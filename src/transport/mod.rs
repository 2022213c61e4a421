//! Chat transport abstraction.
//!
//! The bot only needs to pull incoming text messages and push text replies;
//! anything that can do both can drive it.

mod telegram;

pub use telegram::TelegramTransport;

use async_trait::async_trait;

use crate::expense::ParticipantId;
use crate::Result;

/// The person who sent a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Stable user id on the chat service.
    pub id: ParticipantId,
    /// Username (handle), if the user has one.
    pub username: Option<String>,
    /// First name, always present.
    pub first_name: String,
}

impl Sender {
    /// Create a sender with a username.
    pub fn new(id: ParticipantId, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            id,
            first_name: username.clone(),
            username: Some(username),
        }
    }

    /// Name used for records and replies: the username, else the first name.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

/// A text message received from the chat service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Chat the reply goes to.
    pub chat_id: i64,
    /// Who sent it.
    pub sender: Sender,
    /// Raw message text.
    pub text: String,
}

/// Source of incoming messages and sink for replies.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Wait for the next batch of messages. May return an empty batch.
    async fn receive(&mut self) -> Result<Vec<IncomingMessage>>;

    /// Send a text reply to a chat.
    async fn reply(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Tell the service that every received message has been handled.
    ///
    /// Called once on shutdown so handled messages are not delivered again
    /// after a restart.
    async fn acknowledge(&mut self) -> Result<()> {
        Ok(())
    }
}
