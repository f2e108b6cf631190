//! SQL schema for the MT Navigator SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS messages (
    message_id  TEXT PRIMARY KEY,
    reference   TEXT NOT NULL,   -- SWIFT header reference (field 20)
    format      TEXT NOT NULL,   -- 'mt' | 'mx'
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS investigations (
    investigation_id TEXT PRIMARY KEY,
    reference_number TEXT NOT NULL UNIQUE,
    message_id       TEXT NOT NULL REFERENCES messages(message_id),
    status           TEXT NOT NULL,   -- 'open' | 'in_progress' | 'resolved' | 'closed'
    priority         TEXT NOT NULL,   -- 'low' | 'medium' | 'high' | 'critical'
    customer_info    TEXT,            -- JSON-encoded CustomerInfo or NULL
    resolution_notes TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL,
    resolved_at      TEXT
);

CREATE TABLE IF NOT EXISTS investigation_actions (
    action_id          TEXT PRIMARY KEY,
    investigation_id   TEXT NOT NULL REFERENCES investigations(investigation_id),
    action_type        TEXT NOT NULL,
    description        TEXT NOT NULL,
    suggested_response TEXT,
    status             TEXT NOT NULL,   -- 'pending' | 'in_progress' | 'completed' | 'cancelled'
    priority           TEXT NOT NULL,
    deadline           TEXT,
    notes              TEXT,
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL,
    completed_at       TEXT
);

-- Exactly one row, created with defaults on first read.
CREATE TABLE IF NOT EXISTS user_settings (
    id           INTEGER PRIMARY KEY CHECK (id = 1),
    api_key      TEXT,
    model        TEXT NOT NULL,
    default_mode TEXT NOT NULL,   -- 'convert' | 'extract'
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS investigations_status_idx   ON investigations(status);
CREATE INDEX IF NOT EXISTS investigations_priority_idx ON investigations(priority);
CREATE INDEX IF NOT EXISTS investigations_updated_idx  ON investigations(updated_at);
CREATE INDEX IF NOT EXISTS actions_investigation_idx   ON investigation_actions(investigation_id);
CREATE INDEX IF NOT EXISTS messages_created_idx        ON messages(created_at);

PRAGMA user_version = 1;
";
