//! Key-value settings backed by SQLite.
//!
//! Shares a database with the document store and
//! [`CredentialStore`](crate::auth::CredentialStore). Pass the same path.
//! Command-line flags take priority over anything stored here.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension};
use std::sync::Mutex;

use crate::consts::DEFAULT_AVAILABLE_MINUTES;

/// Setting keys understood by the front-end.
pub mod keys {
    /// Model provider: `anthropic` or `gemini`.
    pub const PROVIDER: &str = "provider";
    /// Provider-specific model id.
    pub const MODEL: &str = "model";
    /// Minutes available for a workout, passed to the generator.
    pub const AVAILABLE_MINUTES: &str = "available_minutes";

    pub const ALL: &[&str] = &[PROVIDER, MODEL, AVAILABLE_MINUTES];
}

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value (upsert). Unknown keys and malformed values are rejected.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        if !keys::ALL.contains(&key) {
            bail!("unknown setting {key:?} (known: {})", keys::ALL.join(", "));
        }
        if key == keys::AVAILABLE_MINUTES {
            parse_minutes(value)?;
        }
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Stored workout length, or the default when unset.
    pub fn available_minutes(&self) -> Result<u32> {
        match self.get(keys::AVAILABLE_MINUTES)? {
            Some(value) => parse_minutes(&value),
            None => Ok(DEFAULT_AVAILABLE_MINUTES),
        }
    }
}

fn parse_minutes(value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => bail!("available minutes must be a positive whole number, got {value:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get(keys::MODEL).unwrap().is_none());
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set(keys::MODEL, "old").unwrap();
        config.set(keys::MODEL, "new").unwrap();
        assert_eq!(config.get(keys::MODEL).unwrap().unwrap(), "new");
    }

    #[test]
    fn remove_deletes_key() {
        let config = mem_config();
        config.set(keys::PROVIDER, "gemini").unwrap();
        config.remove(keys::PROVIDER).unwrap();
        assert!(config.get(keys::PROVIDER).unwrap().is_none());
    }

    #[test]
    fn unknown_key_rejected() {
        let err = mem_config().set("theme", "dark").unwrap_err();
        assert!(err.to_string().contains("unknown setting"));
    }

    #[test]
    fn available_minutes_defaults() {
        assert_eq!(mem_config().available_minutes().unwrap(), DEFAULT_AVAILABLE_MINUTES);
    }

    #[test]
    fn available_minutes_validated() {
        let config = mem_config();
        assert!(config.set(keys::AVAILABLE_MINUTES, "0").is_err());
        assert!(config.set(keys::AVAILABLE_MINUTES, "half an hour").is_err());
        config.set(keys::AVAILABLE_MINUTES, "45").unwrap();
        assert_eq!(config.available_minutes().unwrap(), 45);
    }

    #[test]
    fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-test.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set(keys::MODEL, "persisted").unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(config.get(keys::MODEL).unwrap().unwrap(), "persisted");
        }
    }
}
