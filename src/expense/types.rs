//! Expense types.

use chrono::{DateTime, Utc};

/// Stable identity of a household member (the chat user id).
pub type ParticipantId = i64;

/// A recorded payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Expense ID.
    pub id: i64,
    /// Who paid.
    pub participant_id: ParticipantId,
    /// Payer's display name when the expense was recorded.
    pub participant_name: String,
    /// Amount paid.
    pub amount: f64,
    /// Free-text description.
    pub description: String,
    /// When the expense was recorded.
    pub created_at: DateTime<Utc>,
}

/// New expense for insertion.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub participant_id: ParticipantId,
    pub participant_name: String,
    pub amount: f64,
    pub description: String,
}

impl NewExpense {
    /// Create a new expense.
    pub fn new(
        participant_id: ParticipantId,
        participant_name: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            participant_id,
            participant_name: participant_name.into(),
            amount,
            description: description.into(),
        }
    }
}
