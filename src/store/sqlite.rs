use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::sync::Mutex;
use tracing::debug;

use super::{CollectionPath, DocPath, DocumentStore};
use crate::error::Result;

/// SQLite-backed document store.
///
/// Shares a database with [`Identity`](crate::auth::Identity),
/// [`CredentialStore`](crate::auth::CredentialStore) and
/// [`Config`](crate::config::Config). Pass the same path to all of them.
pub struct SqliteDocuments {
    conn: Mutex<Connection>,
}

impl SqliteDocuments {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id         TEXT NOT NULL,
                data       TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (collection, id)
            );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }
}

#[async_trait]
impl DocumentStore for SqliteDocuments {
    async fn get(&self, path: &DocPath) -> Result<Option<Value>> {
        let conn = self.conn.lock().unwrap();
        let json: Option<String> = conn
            .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                params![path.collection.as_str(), path.id],
                |row| row.get(0),
            )
            .optional()?;
        debug!(%path, found = json.is_some(), "get document");
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, path: &DocPath, doc: &Value) -> Result<()> {
        let json = serde_json::to_string(doc)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)
             ON CONFLICT(collection, id) DO UPDATE
                SET data = excluded.data, updated_at = datetime('now')",
            params![path.collection.as_str(), path.id, json],
        )?;
        debug!(%path, "set document");
        Ok(())
    }

    async fn list(
        &self,
        collection: &CollectionPath,
        limit: Option<usize>,
    ) -> Result<Vec<(String, Value)>> {
        // LIMIT -1 means no limit in SQLite
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, data FROM documents WHERE collection = ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![collection.as_str(), limit], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(%collection, count = rows.len(), "list documents");
        rows.into_iter()
            .map(|(id, json)| -> Result<(String, Value)> { Ok((id, serde_json::from_str(&json)?)) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coll(name: &str) -> CollectionPath {
        let user = crate::domain::UserId::new(name).unwrap();
        CollectionPath::routines(&user)
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = SqliteDocuments::in_memory().unwrap();
        assert!(store.get(&coll("u1").doc("2024-01-01")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_overwrites_whole_document() {
        let store = SqliteDocuments::in_memory().unwrap();
        let path = coll("u1").doc("2024-01-01");
        store.set(&path, &json!({"a": 1, "b": 2})).await.unwrap();
        store.set(&path, &json!({"c": 3})).await.unwrap();
        assert_eq!(store.get(&path).await.unwrap().unwrap(), json!({"c": 3}));
    }

    #[tokio::test]
    async fn list_is_descending_and_limited() {
        let store = SqliteDocuments::in_memory().unwrap();
        let c = coll("u1");
        for id in ["2024-01-02", "2024-03-01", "2023-12-31", "2024-02-15"] {
            store.set(&c.doc(id), &json!({"id": id})).await.unwrap();
        }

        let all: Vec<_> = store
            .list(&c, None)
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(all, ["2024-03-01", "2024-02-15", "2024-01-02", "2023-12-31"]);

        let two = store.list(&c, Some(2)).await.unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].0, "2024-03-01");
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = SqliteDocuments::in_memory().unwrap();
        store.set(&coll("u1").doc("2024-01-01"), &json!(1)).await.unwrap();
        store.set(&coll("u2").doc("2024-01-01"), &json!(2)).await.unwrap();
        assert_eq!(store.list(&coll("u1"), None).await.unwrap().len(), 1);
        assert_eq!(
            store.get(&coll("u2").doc("2024-01-01")).await.unwrap().unwrap(),
            json!(2)
        );
    }
}
