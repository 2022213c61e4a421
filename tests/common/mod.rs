//! Test helpers for integration tests.
//!
//! Provides an in-memory chat transport and setup helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use housebot::config::HouseholdConfig;
use housebot::{Bot, ChatTransport, Database, HousebotError, IncomingMessage, Result, Sender};

/// Chat id used by the test household group.
pub const GROUP_CHAT: i64 = -100;

/// One scripted result of `receive`.
pub enum Batch {
    Messages(Vec<IncomingMessage>),
    Fail(String),
}

/// Transport that replays scripted batches and records replies.
#[derive(Default)]
pub struct MemoryTransport {
    inbox: Mutex<VecDeque<Batch>>,
    sent: Mutex<Vec<(i64, String)>>,
    unreachable_chat: Option<i64>,
    reply_delay: Option<Duration>,
    acknowledged: Mutex<bool>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies to this chat fail.
    pub fn with_unreachable_chat(mut self, chat_id: i64) -> Self {
        self.unreachable_chat = Some(chat_id);
        self
    }

    /// Every reply takes this long to send.
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = Some(delay);
        self
    }

    /// Whether the bot acknowledged its handled messages.
    pub fn acknowledged(&self) -> bool {
        *self.acknowledged.lock().unwrap()
    }

    pub fn push(&self, batch: Batch) {
        self.inbox.lock().unwrap().push_back(batch);
    }

    pub fn push_messages(&self, messages: Vec<IncomingMessage>) {
        self.push(Batch::Messages(messages));
    }

    /// Every reply sent so far, in order.
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Reply texts only.
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }
}

#[async_trait]
impl ChatTransport for MemoryTransport {
    async fn receive(&mut self) -> Result<Vec<IncomingMessage>> {
        let next = self.inbox.lock().unwrap().pop_front();
        match next {
            Some(Batch::Messages(messages)) => Ok(messages),
            Some(Batch::Fail(reason)) => Err(HousebotError::Transport(reason)),
            None => {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) -> Result<()> {
        if let Some(delay) = self.reply_delay {
            tokio::time::sleep(delay).await;
        }
        if self.unreachable_chat == Some(chat_id) {
            return Err(HousebotError::Transport(format!("chat {chat_id} unreachable")));
        }
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn acknowledge(&mut self) -> Result<()> {
        *self.acknowledged.lock().unwrap() = true;
        Ok(())
    }
}

/// Build a message from a member with a username.
pub fn message(sender_id: i64, username: &str, text: &str) -> IncomingMessage {
    IncomingMessage {
        chat_id: GROUP_CHAT,
        sender: Sender::new(sender_id, username),
        text: text.to_string(),
    }
}

/// Household settings for tests.
pub fn household(participant_count: usize) -> HouseholdConfig {
    HouseholdConfig {
        participant_count,
        ..HouseholdConfig::default()
    }
}

/// Bot over an in-memory database and transport.
pub async fn test_bot(transport: MemoryTransport, household: HouseholdConfig) -> Bot<MemoryTransport> {
    let db = Database::open_in_memory().await.unwrap();
    Bot::new(transport, db, household)
}

/// Feed one batch through the bot and return the replies it produced.
pub async fn exchange(bot: &mut Bot<MemoryTransport>, messages: Vec<IncomingMessage>) -> Vec<String> {
    let before = bot.transport().sent().len();
    bot.transport().push_messages(messages);
    bot.poll_once().await.unwrap();
    bot.transport().sent_texts().split_off(before)
}

/// Send one command and return its single reply.
pub async fn say(bot: &mut Bot<MemoryTransport>, sender_id: i64, username: &str, text: &str) -> String {
    let mut replies = exchange(bot, vec![message(sender_id, username, text)]).await;
    assert_eq!(replies.len(), 1, "expected one reply to {text:?}");
    replies.remove(0)
}
