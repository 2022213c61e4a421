//! Database schema and migrations for housebot.
//!
//! Migrations are applied in order when the database is opened; the
//! schema_version table records which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Expenses
    r#"
CREATE TABLE expenses (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    participant_id    INTEGER NOT NULL,        -- chat user id of the payer
    participant_name  TEXT NOT NULL,           -- display name at the time of payment
    amount            REAL NOT NULL CHECK (amount >= 0),
    description       TEXT NOT NULL DEFAULT '',
    created_at        TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_expenses_participant_id ON expenses(participant_id);
"#,
    // v2: Grocery list
    r#"
CREATE TABLE groceries (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,                 -- matched case-sensitively against expense descriptions
    added_by    TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_groceries_name ON groceries(name);
"#,
    // v3: Chores
    r#"
CREATE TABLE chores (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    assigned_to_name  TEXT NOT NULL,
    assigned_by_id    INTEGER,                 -- NULL when assigned to someone else
    description       TEXT NOT NULL,
    status            TEXT NOT NULL DEFAULT 'pending',  -- 'pending', 'completed'
    created_at        TEXT NOT NULL DEFAULT (datetime('now')),
    completed_at      TEXT
);

CREATE INDEX idx_chores_status ON chores(status);
CREATE INDEX idx_chores_lookup ON chores(description, assigned_to_name);
"#,
    // v4: Per-user preferences
    r#"
CREATE TABLE user_preferences (
    participant_id  INTEGER PRIMARY KEY,
    display_name    TEXT NOT NULL,
    emoji           TEXT NOT NULL,
    updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_user_preferences_display_name ON user_preferences(display_name);
"#,
];
