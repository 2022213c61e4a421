//! Expense splitting and settlement.
//!
//! The engine splits the total cost evenly across the household, derives each
//! member's net balance and produces the transfers that settle everyone up.

mod engine;
mod report;

pub use engine::{
    apply_new_expense, compute_balances, compute_balances_with_roster, settle_debts, Balance,
    BalanceSheet, ExpenseSplit, Settlement, Transfer, SETTLED_EPSILON,
};
pub use report::{format_amount, format_balance_report, format_split};
