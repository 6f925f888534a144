use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

/// Model-provider API keys stored in SQLite.
///
/// Shares a database with the document store, identity and config; pass
/// the same path.
pub struct CredentialStore {
    conn: Mutex<Connection>,
}

impl CredentialStore {
    /// Open or create a credentials table in the given database path.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open credentials database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS credentials (
                provider TEXT PRIMARY KEY,
                api_key  TEXT NOT NULL
            )",
        )
        .context("failed to create credentials table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Stored key for a provider.
    pub fn get(&self, provider: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let key = conn
            .query_row(
                "SELECT api_key FROM credentials WHERE provider = ?1",
                [provider],
                |row| row.get(0),
            )
            .optional()?;
        Ok(key)
    }

    /// Store a key for a provider (upsert).
    pub fn set(&self, provider: &str, api_key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO credentials (provider, api_key) VALUES (?1, ?2)
             ON CONFLICT(provider) DO UPDATE SET api_key = excluded.api_key",
            [provider, api_key],
        )?;
        Ok(())
    }

    pub fn remove(&self, provider: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM credentials WHERE provider = ?1", [provider])?;
        Ok(())
    }

    /// Resolve the key to use for a provider.
    /// Priority: stored key, then environment variable.
    pub fn api_key(&self, provider: &str, env_var: &str) -> Result<Option<String>> {
        if let Some(key) = self.get(provider)? {
            return Ok(Some(key));
        }

        if let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Ok(Some(key));
        }

        Ok(None)
    }
}
