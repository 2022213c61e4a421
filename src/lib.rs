//! Housebot - household chat bot
//!
//! Tracks shared expenses, the grocery list and chores for a small household,
//! and works out who owes whom.

pub mod bot;
pub mod chore;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod expense;
pub mod grocery;
pub mod logging;
pub mod preference;
pub mod settlement;
pub mod transport;

pub use bot::{Bot, CommandRouter};
pub use config::Config;
pub use db::{Database, DbPool};
pub use error::{HousebotError, Result};
pub use expense::{Expense, ParticipantId};
pub use settlement::{compute_balances, settle_debts, BalanceSheet, Settlement, Transfer};
pub use transport::{ChatTransport, IncomingMessage, Sender, TelegramTransport};
