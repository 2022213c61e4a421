//! Expense recording workflow.

use std::num::NonZeroUsize;

use tracing::{debug, error};

use super::repository::ExpenseRepository;
use super::types::{Expense, NewExpense, ParticipantId};
use crate::db::Database;
use crate::grocery::GroceryRepository;
use crate::settlement::{
    apply_new_expense, compute_balances_with_roster, settle_debts, BalanceSheet, ExpenseSplit,
    Settlement,
};
use crate::{HousebotError, Result};

/// What happened to the grocery list after recording an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroceryRemoval {
    /// A list item with the same name was removed.
    Removed,
    /// No list item matched the description.
    NotListed,
    /// The lookup or delete failed; the expense is still recorded.
    Failed,
}

/// Outcome of recording an expense.
#[derive(Debug, Clone)]
pub struct RecordedExpense {
    /// The stored expense (always the full amount).
    pub expense: Expense,
    /// Advisory split against the payer's prior balance.
    pub split: ExpenseSplit,
    /// Grocery list side effect.
    pub grocery: GroceryRemoval,
}

/// Service for recording expenses and reading balances.
pub struct ExpenseService<'a> {
    db: &'a Database,
    participant_count: NonZeroUsize,
}

impl<'a> ExpenseService<'a> {
    /// Create a new ExpenseService.
    pub fn new(db: &'a Database, participant_count: NonZeroUsize) -> Self {
        Self {
            db,
            participant_count,
        }
    }

    /// Record a payment.
    ///
    /// Computes the split against the existing history, stores the full
    /// amount, then removes a grocery item whose name equals the description.
    /// The read and the write are not transactional.
    pub async fn record_expense(
        &self,
        payer_id: ParticipantId,
        payer_name: &str,
        amount: f64,
        description: &str,
    ) -> Result<RecordedExpense> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(HousebotError::Validation(format!(
                "amount must be a non-negative number, got {amount}"
            )));
        }

        let expenses = ExpenseRepository::new(self.db.pool());
        let existing = expenses.list_all().await?;
        let split = apply_new_expense(&existing, self.participant_count, payer_id, amount);
        debug!(
            payer_id,
            amount,
            debt_reduction = split.debt_reduction,
            "recording expense"
        );

        let expense = expenses
            .create(&NewExpense::new(payer_id, payer_name, amount, description))
            .await?;

        let grocery = match GroceryRepository::new(self.db.pool())
            .delete_by_name(description)
            .await
        {
            Ok(true) => GroceryRemoval::Removed,
            Ok(false) => GroceryRemoval::NotListed,
            Err(e) => {
                error!("Failed to remove grocery item {:?}: {}", description, e);
                GroceryRemoval::Failed
            }
        };

        Ok(RecordedExpense {
            expense,
            split,
            grocery,
        })
    }

    /// Current balances and the transfers that settle them.
    pub async fn settlement(
        &self,
        roster: &[ParticipantId],
    ) -> Result<(BalanceSheet, Settlement, Vec<Expense>)> {
        let expenses = ExpenseRepository::new(self.db.pool()).list_all().await?;
        let sheet = compute_balances_with_roster(&expenses, self.participant_count, roster);
        let settlement = settle_debts(&sheet.balances);
        Ok((sheet, settlement, expenses))
    }
}
