//! SQL schema initialization.

use rusqlite::Connection;

use crate::error::Result;

/// Schema version for migration tracking.
pub const SCHEMA_VERSION: u32 = 1;

/// Initialize the database schema.
///
/// Creates all tables if they don't exist. Idempotent — calling it multiple
/// times is safe.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // WAL keeps readers cheap while the daemon commits.
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version: Option<u32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    if current_version.is_none() {
        create_tables(conn)?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [SCHEMA_VERSION],
        )?;
    }

    Ok(())
}

/// Create all database tables.
fn create_tables(conn: &Connection) -> Result<()> {
    // Working state: opaque key/value bytes.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS state (
            key TEXT PRIMARY KEY,
            value BLOB NOT NULL
        )",
        [],
    )?;

    // Committed versions: one opaque snapshot per height.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS versions (
            height INTEGER PRIMARY KEY,
            snapshot BLOB NOT NULL
        )",
        [],
    )?;

    Ok(())
}
