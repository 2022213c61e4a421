//! Shared expenses.
//!
//! Expenses are immutable payment records. The service layer ties a new
//! payment to the settlement engine and the grocery list.

mod repository;
mod service;
mod types;

pub use repository::ExpenseRepository;
pub use service::{ExpenseService, GroceryRemoval, RecordedExpense};
pub use types::{Expense, NewExpense, ParticipantId};
