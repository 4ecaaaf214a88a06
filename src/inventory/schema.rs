//! SQLite connection setup and schema migrations

use crate::error::Result;
use rusqlite::{params, Connection};
use std::path::Path;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const BUSY_TIMEOUT_MS: u32 = 5000;

const SCHEMA_V1: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS food_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    volume REAL NOT NULL,
    volume_unit TEXT NOT NULL DEFAULT 'g',
    expiry_date TEXT NOT NULL,
    notes TEXT,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
    status TEXT NOT NULL,
    days_until_expiry INTEGER NOT NULL,
    date_added TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_food_items_category ON food_items(category_id);
CREATE INDEX IF NOT EXISTS idx_food_items_expiry ON food_items(expiry_date);
";

/// Open (creating if needed) an on-disk database
pub fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    tracing::debug!(path = %path.display(), "Database connection opened");

    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
    configure(&conn)?;
    migrate(&conn)?;
    Ok(conn)
}

/// Open a private in-memory database
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrate(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = {};",
        BUSY_TIMEOUT_MS
    ))?;
    Ok(())
}

/// Schema version recorded in the database (0 when unversioned)
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
        [],
        |r| r.get(0),
    )?;
    if !exists {
        return Ok(0);
    }

    let version: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;
    Ok(version)
}

/// Bring the schema up to [`CURRENT_SCHEMA_VERSION`]
pub fn migrate(conn: &Connection) -> Result<()> {
    let version = schema_version(conn)?;
    if version >= CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![1u32],
        )?;
        tracing::info!(from = version, to = 1, "Schema migrated");
    }

    Ok(())
}
