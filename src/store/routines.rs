use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{CollectionPath, DocPath, DocumentStore};
use crate::domain::{ExerciseRoutine, RoutineDate, UserId};
use crate::error::Result;

/// A stored routine together with the day it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedRoutine {
    pub date: RoutineDate,
    pub routine: ExerciseRoutine,
}

/// Routines keyed by (user, day). One document per day; saves overwrite.
#[derive(Clone)]
pub struct RoutineStore {
    docs: Arc<dyn DocumentStore>,
}

impl RoutineStore {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    /// Replace the routine stored for `date`.
    pub async fn save(
        &self,
        user: &UserId,
        date: RoutineDate,
        routine: &ExerciseRoutine,
    ) -> Result<()> {
        for exercise in &routine.exercises {
            exercise.validate()?;
        }
        let path = DocPath::routine(user, date);
        self.docs.set(&path, &serde_json::to_value(routine)?).await?;
        info!(%user, %date, exercises = routine.len(), "routine saved");
        Ok(())
    }

    /// The routine for `date`, or `None` if none was saved that day.
    pub async fn load(&self, user: &UserId, date: RoutineDate) -> Result<Option<ExerciseRoutine>> {
        let path = DocPath::routine(user, date);
        match self.docs.get(&path).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => {
                debug!(%user, %date, "no routine for this date");
                Ok(None)
            }
        }
    }

    /// Every stored routine, newest day first.
    pub async fn list_all(&self, user: &UserId) -> Result<Vec<DatedRoutine>> {
        self.list(user, None).await
    }

    /// The `limit` most recent routines, newest day first.
    pub async fn list_recent(&self, user: &UserId, limit: usize) -> Result<Vec<DatedRoutine>> {
        self.list(user, Some(limit)).await
    }

    /// Read the routine for `date`, apply `mutate`, write the whole document back.
    ///
    /// Returns `None` without writing when there is no routine that day.
    /// Nothing guards against a concurrent writer: the last save wins.
    pub async fn update<T: Send>(
        &self,
        user: &UserId,
        date: RoutineDate,
        mutate: impl FnOnce(&mut ExerciseRoutine) -> Result<T> + Send,
    ) -> Result<Option<(T, ExerciseRoutine)>> {
        let Some(mut routine) = self.load(user, date).await? else {
            return Ok(None);
        };
        let outcome = mutate(&mut routine)?;
        self.save(user, date, &routine).await?;
        Ok(Some((outcome, routine)))
    }

    async fn list(&self, user: &UserId, limit: Option<usize>) -> Result<Vec<DatedRoutine>> {
        let docs = self
            .docs
            .list(&CollectionPath::routines(user), limit)
            .await?;
        let mut routines = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            let date = match id.parse::<RoutineDate>() {
                Ok(date) => date,
                Err(_) => {
                    warn!(%user, %id, "skipping routine document with a non-date id");
                    continue;
                }
            };
            routines.push(DatedRoutine {
                date,
                routine: serde_json::from_value(doc)?,
            });
        }
        Ok(routines)
    }
}
