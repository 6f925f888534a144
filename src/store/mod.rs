//! Path-addressed document persistence.
//!
//! Documents live at `users/{userId}` (profile) and
//! `users/{userId}/routines/{YYYY-MM-DD}` (routine). Every write replaces
//! the whole document; there are no partial updates and no merge.

pub mod profiles;
pub mod routines;
pub mod sqlite;

pub use profiles::ProfileStore;
pub use routines::{DatedRoutine, RoutineStore};

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::domain::{RoutineDate, UserId};
use crate::error::Result;

/// A collection of documents, e.g. `users/u1/routines`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn users() -> Self {
        Self("users".to_string())
    }

    pub fn routines(user: &UserId) -> Self {
        Self(format!("users/{user}/routines"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.into(),
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single document: its collection plus its id within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: CollectionPath,
    pub id: String,
}

impl DocPath {
    pub fn profile(user: &UserId) -> Self {
        CollectionPath::users().doc(user.as_str())
    }

    pub fn routine(user: &UserId, date: RoutineDate) -> Self {
        CollectionPath::routines(user).doc(date.to_string())
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A generic document-store client. Could be SQLite, a remote service, etc.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The document at `path`, or `None` if nothing was ever written there.
    async fn get(&self, path: &DocPath) -> Result<Option<Value>>;

    /// Replace the document at `path`.
    async fn set(&self, path: &DocPath, doc: &Value) -> Result<()>;

    /// Documents in `collection`, ordered by id descending, at most `limit`.
    async fn list(
        &self,
        collection: &CollectionPath,
        limit: Option<usize>,
    ) -> Result<Vec<(String, Value)>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_path() {
        let user = UserId::new("u1").unwrap();
        assert_eq!(DocPath::profile(&user).to_string(), "users/u1");
    }

    #[test]
    fn routine_path() {
        let user = UserId::new("u1").unwrap();
        let date: RoutineDate = "2024-05-01".parse().unwrap();
        let path = DocPath::routine(&user, date);
        assert_eq!(path.to_string(), "users/u1/routines/2024-05-01");
        assert_eq!(path.collection, CollectionPath::routines(&user));
        assert_eq!(path.id, "2024-05-01");
    }
}
