//! SQLite save store.
//!
//! RULE: Only store.rs talks to the database. The engine sees it through
//! the `SaveStorage` trait like any other backend.

use crate::{error::GameResult, persistence::SaveStorage};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SaveStore {
    conn: Connection,
    path: Option<String>, // None for :memory:
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn, path: Some(path.to_string()) })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_save_slot.sql"))?;
        Ok(())
    }

    /// How many times the slot has been written, or None if it never was.
    pub fn revision(&self, key: &str) -> GameResult<Option<i64>> {
        let revision = self
            .conn
            .query_row(
                "SELECT revision FROM save_slot WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(revision)
    }

    pub fn slot_keys(&self) -> GameResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM save_slot ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl SaveStorage for SaveStore {
    fn read(&self, key: &str) -> GameResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM save_slot WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write(&mut self, key: &str, payload: &str) -> GameResult<()> {
        self.conn.execute(
            "INSERT INTO save_slot (key, payload, revision) VALUES (?1, ?2, 1)
             ON CONFLICT(key) DO UPDATE SET
                payload  = excluded.payload,
                revision = save_slot.revision + 1",
            params![key, payload],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GameResult<()> {
        self.conn
            .execute("DELETE FROM save_slot WHERE key = ?1", params![key])?;
        Ok(())
    }
}
