//! Chore repository for housebot.

use chrono::Utc;

use super::types::{Chore, ChoreStatus, NewChore};
use crate::datetime::parse_db_datetime;
use crate::db::DbPool;
use crate::{HousebotError, Result};

#[derive(sqlx::FromRow)]
struct ChoreRow {
    id: i64,
    assigned_to_name: String,
    assigned_by_id: Option<i64>,
    description: String,
    status: String,
    created_at: String,
    completed_at: Option<String>,
}

impl From<ChoreRow> for Chore {
    fn from(row: ChoreRow) -> Self {
        Self {
            id: row.id,
            assigned_to_name: row.assigned_to_name,
            assigned_by_id: row.assigned_by_id,
            description: row.description,
            status: row.status.parse().unwrap_or_default(),
            created_at: parse_db_datetime(&row.created_at).unwrap_or_else(Utc::now),
            completed_at: row.completed_at.and_then(|s| parse_db_datetime(&s)),
        }
    }
}

/// Repository for chores.
pub struct ChoreRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ChoreRepository<'a> {
    /// Create a new ChoreRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a pending chore.
    pub async fn create(&self, chore: &NewChore) -> Result<Chore> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO chores (assigned_to_name, assigned_by_id, description, status)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&chore.assigned_to_name)
        .bind(chore.assigned_by_id)
        .bind(&chore.description)
        .bind(ChoreStatus::Pending.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| HousebotError::NotFound("chore".to_string()))
    }

    /// Get a chore by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Chore>> {
        let row = sqlx::query_as::<_, ChoreRow>(
            "SELECT id, assigned_to_name, assigned_by_id, description, status,
                    created_at, completed_at
             FROM chores WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(row.map(Chore::from))
    }

    /// List pending chores, most recently assigned first.
    pub async fn list_pending(&self) -> Result<Vec<Chore>> {
        let rows = sqlx::query_as::<_, ChoreRow>(
            "SELECT id, assigned_to_name, assigned_by_id, description, status,
                    created_at, completed_at
             FROM chores WHERE status = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(ChoreStatus::Pending.as_str())
        .fetch_all(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Chore::from).collect())
    }

    /// Mark the oldest pending chore matching description and assignee as completed.
    ///
    /// The description must match exactly; the username ignores case.
    /// Returns the updated chore, or None if nothing matched.
    pub async fn complete(&self, description: &str, assigned_to_name: &str) -> Result<Option<Chore>> {
        let id: Option<i64> = sqlx::query_scalar(
            "UPDATE chores SET status = ?, completed_at = datetime('now')
             WHERE id = (
                 SELECT id FROM chores
                 WHERE description = ? AND assigned_to_name = ? COLLATE NOCASE AND status = ?
                 ORDER BY id LIMIT 1
             )
             RETURNING id",
        )
        .bind(ChoreStatus::Completed.as_str())
        .bind(description)
        .bind(assigned_to_name)
        .bind(ChoreStatus::Pending.as_str())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        match id {
            Some(id) => self.get_by_id(id).await,
            None => Ok(None),
        }
    }
}
