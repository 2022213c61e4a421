//! Grocery repository for housebot.

use chrono::{DateTime, Utc};

use crate::datetime::parse_db_datetime;
use crate::db::DbPool;
use crate::{HousebotError, Result};

/// An item on the grocery list.
#[derive(Debug, Clone)]
pub struct GroceryItem {
    /// Item ID.
    pub id: i64,
    /// Item name, matched exactly against expense descriptions.
    pub name: String,
    /// Display name of whoever added it.
    pub added_by: String,
    /// When the item was added.
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct GroceryRow {
    id: i64,
    name: String,
    added_by: String,
    created_at: String,
}

impl From<GroceryRow> for GroceryItem {
    fn from(row: GroceryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            added_by: row.added_by,
            created_at: parse_db_datetime(&row.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for grocery list items.
pub struct GroceryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> GroceryRepository<'a> {
    /// Create a new GroceryRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Add an item to the list.
    pub async fn add(&self, name: &str, added_by: &str) -> Result<GroceryItem> {
        let row = sqlx::query_as::<_, GroceryRow>(
            "INSERT INTO groceries (name, added_by) VALUES (?, ?)
             RETURNING id, name, added_by, created_at",
        )
        .bind(name)
        .bind(added_by)
        .fetch_one(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(row.into())
    }

    /// List all items, most recently added first.
    pub async fn list(&self) -> Result<Vec<GroceryItem>> {
        let rows = sqlx::query_as::<_, GroceryRow>(
            "SELECT id, name, added_by, created_at
             FROM groceries ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(GroceryItem::from).collect())
    }

    /// Delete the oldest item with exactly this name.
    ///
    /// Returns true if an item was removed.
    pub async fn delete_by_name(&self, name: &str) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM groceries
             WHERE id = (SELECT id FROM groceries WHERE name = ? ORDER BY id LIMIT 1)",
        )
        .bind(name)
        .execute(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
