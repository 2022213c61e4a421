//! User preference repository for housebot.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::datetime::parse_db_datetime;
use crate::db::DbPool;
use crate::expense::ParticipantId;
use crate::{HousebotError, Result};

/// A member's chosen emoji.
#[derive(Debug, Clone)]
pub struct UserPreference {
    /// Member identity.
    pub participant_id: ParticipantId,
    /// Display name as of the last update.
    pub display_name: String,
    /// Emoji glyph.
    pub emoji: String,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserPreferenceRow {
    participant_id: i64,
    display_name: String,
    emoji: String,
    updated_at: String,
}

impl From<UserPreferenceRow> for UserPreference {
    fn from(row: UserPreferenceRow) -> Self {
        Self {
            participant_id: row.participant_id,
            display_name: row.display_name,
            emoji: row.emoji,
            updated_at: parse_db_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for user preferences.
pub struct PreferenceRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PreferenceRepository<'a> {
    /// Create a new PreferenceRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert or replace the emoji for a member; latest write wins.
    pub async fn upsert_emoji(
        &self,
        participant_id: ParticipantId,
        display_name: &str,
        emoji: &str,
    ) -> Result<UserPreference> {
        let row = sqlx::query_as::<_, UserPreferenceRow>(
            "INSERT INTO user_preferences (participant_id, display_name, emoji)
             VALUES (?, ?, ?)
             ON CONFLICT(participant_id) DO UPDATE SET
                 display_name = excluded.display_name,
                 emoji = excluded.emoji,
                 updated_at = datetime('now')
             RETURNING participant_id, display_name, emoji, updated_at",
        )
        .bind(participant_id)
        .bind(display_name)
        .bind(emoji)
        .fetch_one(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(row.into())
    }

    /// Get the preference for a member.
    pub async fn get(&self, participant_id: ParticipantId) -> Result<Option<UserPreference>> {
        let row = sqlx::query_as::<_, UserPreferenceRow>(
            "SELECT participant_id, display_name, emoji, updated_at
             FROM user_preferences WHERE participant_id = ?",
        )
        .bind(participant_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(row.map(UserPreference::from))
    }

    /// List all preferences, ordered by display name.
    pub async fn list_all(&self) -> Result<Vec<UserPreference>> {
        let rows = sqlx::query_as::<_, UserPreferenceRow>(
            "SELECT participant_id, display_name, emoji, updated_at
             FROM user_preferences ORDER BY display_name COLLATE NOCASE, participant_id",
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| HousebotError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(UserPreference::from).collect())
    }

    /// Load every preference into a lookup table.
    pub async fn directory(&self, default_emoji: &str) -> Result<MemberDirectory> {
        Ok(MemberDirectory::new(self.list_all().await?, default_emoji))
    }
}

/// Emoji and name lookup by member id or display name.
///
/// Expenses are keyed by id, while chores and groceries only know usernames,
/// so both lookups are needed.
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    by_id: HashMap<ParticipantId, String>,
    by_name: HashMap<String, String>,
    names: HashMap<ParticipantId, String>,
    default_emoji: String,
}

impl MemberDirectory {
    /// Build a directory from stored preferences.
    pub fn new(preferences: Vec<UserPreference>, default_emoji: impl Into<String>) -> Self {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        let mut names = HashMap::new();
        for pref in preferences {
            by_name.insert(pref.display_name.to_lowercase(), pref.emoji.clone());
            names.insert(pref.participant_id, pref.display_name);
            by_id.insert(pref.participant_id, pref.emoji);
        }
        Self {
            by_id,
            by_name,
            names,
            default_emoji: default_emoji.into(),
        }
    }

    /// Remember a display name for a member without a stored preference.
    ///
    /// Names from preferences take precedence and are never replaced.
    pub fn register_name(&mut self, id: ParticipantId, name: &str) {
        self.names.entry(id).or_insert_with(|| name.to_string());
    }

    /// Display name for a member id, if known.
    pub fn name_for_id(&self, id: ParticipantId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Emoji followed by the display name, or just the emoji for unknown members.
    pub fn label_for_id(&self, id: ParticipantId) -> String {
        match self.name_for_id(id) {
            Some(name) => format!("{} {}", self.for_id(id), name),
            None => self.for_id(id).to_string(),
        }
    }

    /// Emoji for a member id, or the default.
    pub fn for_id(&self, id: ParticipantId) -> &str {
        self.by_id
            .get(&id)
            .map(String::as_str)
            .unwrap_or(&self.default_emoji)
    }

    /// Emoji for a username (case-insensitive), or the default.
    pub fn for_name(&self, name: &str) -> &str {
        self.by_name
            .get(&name.to_lowercase())
            .map(String::as_str)
            .unwrap_or(&self.default_emoji)
    }
}
