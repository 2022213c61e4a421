//! Household bot: command parsing, dispatch and the polling loop.

pub mod command;
mod router;
mod runner;

pub use command::{parse_input, BotInput, HouseCommand};
pub use router::{rent_days_reply, CommandRouter};
pub use runner::Bot;
