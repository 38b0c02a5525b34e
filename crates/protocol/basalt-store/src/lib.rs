//! Durable versioned state store for the Basalt daemon.
//!
//! The store is an opaque key-value byte store plus a ledger of committed
//! version snapshots, backed by a single SQLite database file:
//!
//! - **Working state** (`state` table): the current value under each key.
//! - **Versions** (`versions` table): one opaque snapshot blob per committed
//!   height, queried by [`NodeStore::load_height`] and trimmed by
//!   [`NodeStore::prune_below`].
//!
//! A store is opened by path exactly once per process and owned exclusively
//! by the application instance (or the read-only command) that opened it.
//! Open failures are fatal and never retried.
//!
//! # Example
//!
//! ```no_run
//! use basalt_store::NodeStore;
//! use std::path::Path;
//!
//! let mut store = NodeStore::open(Path::new("/var/lib/basalt/data/basalt.db"))?;
//! store.put("balances/alice", b"100")?;
//! store.save_version(1, b"snapshot-bytes")?;
//! assert_eq!(store.latest_height()?, Some(1));
//! # Ok::<(), basalt_store::StoreError>(())
//! ```

pub mod error;
pub mod schema;

pub use error::{Result, StoreError};

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

/// Handle to the daemon's durable store.
///
/// Owned exclusively by one component for the process lifetime; there is no
/// interior locking because there is no intra-process sharing.
pub struct NodeStore {
    conn: Connection,
    path: PathBuf,
}

impl NodeStore {
    /// Open (or create) the store at the given database path.
    ///
    /// Parent directories are created as needed and the schema is
    /// initialized idempotently.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        schema::initialize_schema(&conn)?;
        tracing::debug!(path = %path.display(), "opened node store");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the value under a key in the working state.
    pub fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.conn.execute(
            "INSERT INTO state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Get the value under a key in the working state.
    pub fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row("SELECT value FROM state WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Remove a key from the working state.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM state WHERE key = ?1", [key])?;
        Ok(())
    }

    /// All working-state entries, ordered by key.
    pub fn state_entries(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM state ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Replace the entire working state with the given entries.
    ///
    /// Used when reconstructing state at a historical height.
    pub fn replace_state(&mut self, entries: &[(String, Vec<u8>)]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM state", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO state (key, value) VALUES (?1, ?2)")?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Record the snapshot for a committed height.
    pub fn save_version(&mut self, height: u64, snapshot: &[u8]) -> Result<()> {
        self.conn.execute(
            "INSERT INTO versions (height, snapshot) VALUES (?1, ?2)
             ON CONFLICT(height) DO UPDATE SET snapshot = excluded.snapshot",
            params![height, snapshot],
        )?;
        Ok(())
    }

    /// Load the snapshot committed at exactly the given height.
    ///
    /// Returns `None` if that height was never committed (or has been
    /// pruned) — the caller decides whether that is an error.
    pub fn load_height(&self, height: u64) -> Result<Option<Vec<u8>>> {
        let snapshot = self
            .conn
            .query_row(
                "SELECT snapshot FROM versions WHERE height = ?1",
                [height],
                |row| row.get(0),
            )
            .optional()?;
        Ok(snapshot)
    }

    /// The highest committed height, if any.
    pub fn latest_height(&self) -> Result<Option<u64>> {
        let height = self
            .conn
            .query_row("SELECT MAX(height) FROM versions", [], |row| {
                row.get::<_, Option<u64>>(0)
            })?;
        Ok(height)
    }

    /// All committed heights, ascending.
    pub fn heights(&self) -> Result<Vec<u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT height FROM versions ORDER BY height")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut heights = Vec::new();
        for row in rows {
            heights.push(row?);
        }
        Ok(heights)
    }

    /// Delete versions below `cutoff`, retaining every `keep_every`th height
    /// (0 retains none periodically). Returns the number of versions removed.
    pub fn prune_below(&mut self, cutoff: u64, keep_every: u64) -> Result<usize> {
        let removed = if keep_every == 0 {
            self.conn
                .execute("DELETE FROM versions WHERE height < ?1", [cutoff])?
        } else {
            self.conn.execute(
                "DELETE FROM versions WHERE height < ?1 AND height % ?2 != 0",
                params![cutoff, keep_every],
            )?
        };
        if removed > 0 {
            tracing::debug!(cutoff, keep_every, removed, "pruned versions");
        }
        Ok(removed)
    }
}
