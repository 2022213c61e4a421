//! Expense repository for housebot.

use chrono::Utc;

use super::types::{Expense, NewExpense};
use crate::datetime::parse_db_datetime;
use crate::db::DbPool;
use crate::{HousebotError, Result};

/// Database row type for Expense.
#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: i64,
    participant_id: i64,
    participant_name: String,
    amount: f64,
    description: String,
    created_at: String,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: row.id,
            participant_id: row.participant_id,
            participant_name: row.participant_name,
            amount: row.amount,
            description: row.description,
            created_at: parse_db_datetime(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for expense records.
pub struct ExpenseRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ExpenseRepository<'a> {
    /// Create a new ExpenseRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Record a new expense.
    pub async fn create(&self, expense: &NewExpense) -> Result<Expense> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO expenses (participant_id, participant_name, amount, description)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(expense.participant_id)
        .bind(&expense.participant_name)
        .bind(expense.amount)
        .bind(&expense.description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| HousebotError::NotFound("expense".to_string()))
    }

    /// Get an expense by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Expense>> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            "SELECT id, participant_id, participant_name, amount, description, created_at
             FROM expenses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(row.map(Expense::from))
    }

    /// List every expense in the order it was recorded.
    pub async fn list_all(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            "SELECT id, participant_id, participant_name, amount, description, created_at
             FROM expenses ORDER BY id",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Expense::from).collect())
    }

    /// Count all expenses.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM expenses")
            .fetch_one(self.pool)
            .await
            .map_err(|e| HousebotError::Database(e.to_string()))?;
        Ok(count.0)
    }
}
