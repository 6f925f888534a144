use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};
use tokio::sync::watch;
use tracing::info;

use crate::domain::UserId;
use crate::error::{Error, Result};

/// The signed-in user, as reported by the identity provider.
///
/// Persisted so the terminal front-end stays signed in between runs, and
/// observable through [`Identity::subscribe`] so that anything derived from
/// the current user (such as the profile stream) can react to logout.
pub struct Identity {
    conn: Mutex<Connection>,
    current: watch::Sender<Option<UserId>>,
}

impl Identity {
    /// Open or create the session table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session (
                slot    INTEGER PRIMARY KEY CHECK (slot = 0),
                user_id TEXT NOT NULL
            )",
        )?;
        let stored: Option<String> = conn
            .query_row("SELECT user_id FROM session WHERE slot = 0", [], |row| {
                row.get(0)
            })
            .optional()?;
        let user = stored.map(UserId::new).transpose()?;
        let (current, _) = watch::channel(user);
        Ok(Self {
            conn: Mutex::new(conn),
            current,
        })
    }

    pub fn login(&self, user: UserId) -> Result<()> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO session (slot, user_id) VALUES (0, ?1)
                 ON CONFLICT(slot) DO UPDATE SET user_id = excluded.user_id",
                [user.as_str()],
            )?;
        }
        info!(%user, "signed in");
        self.current.send_replace(Some(user));
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        {
            let conn = self.conn.lock().unwrap();
            conn.execute("DELETE FROM session", [])?;
        }
        if let Some(user) = self.current.send_replace(None) {
            info!(%user, "signed out");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<UserId> {
        self.current.borrow().clone()
    }

    /// The signed-in user, or [`Error::Unauthorized`].
    pub fn require(&self) -> Result<UserId> {
        self.current().ok_or(Error::Unauthorized)
    }

    /// Watch auth state. The receiver sees the current value immediately.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.current.subscribe()
    }
}
