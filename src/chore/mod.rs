//! Household chores.
//!
//! Chores are assigned by username and move from pending to completed when
//! the assignee reports them done.

mod repository;
mod types;

pub use repository::ChoreRepository;
pub use types::{Chore, ChoreStatus, NewChore};
