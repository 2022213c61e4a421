//! Chore types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::expense::ParticipantId;

/// Chore status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChoreStatus {
    /// Not done yet.
    #[default]
    Pending,
    /// Done.
    Completed,
}

impl ChoreStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoreStatus::Pending => "pending",
            ChoreStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ChoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChoreStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ChoreStatus::Pending),
            "completed" => Ok(ChoreStatus::Completed),
            _ => Err(format!("unknown chore status: {s}")),
        }
    }
}

/// A chore assigned to a household member.
#[derive(Debug, Clone)]
pub struct Chore {
    /// Chore ID.
    pub id: i64,
    /// Username of the assignee.
    pub assigned_to_name: String,
    /// Issuer's id when they assigned the chore to themselves.
    pub assigned_by_id: Option<ParticipantId>,
    /// What needs doing.
    pub description: String,
    /// Current status.
    pub status: ChoreStatus,
    /// When the chore was assigned.
    pub created_at: DateTime<Utc>,
    /// When the chore was completed.
    pub completed_at: Option<DateTime<Utc>>,
}

/// New chore for insertion.
#[derive(Debug, Clone)]
pub struct NewChore {
    pub assigned_to_name: String,
    pub assigned_by_id: Option<ParticipantId>,
    pub description: String,
}

impl NewChore {
    /// A chore the issuer takes on themselves.
    pub fn self_assigned(
        participant_id: ParticipantId,
        username: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            assigned_to_name: username.into(),
            assigned_by_id: Some(participant_id),
            description: description.into(),
        }
    }

    /// A chore handed to someone else, known only by username.
    pub fn assigned_to(username: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            assigned_to_name: username.into(),
            assigned_by_id: None,
            description: description.into(),
        }
    }
}
