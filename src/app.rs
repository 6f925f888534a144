//! The application service: every user-facing operation, gated on the
//! signed-in user.

use std::sync::Arc;

use futures::Stream;
use tracing::info;

use crate::auth::Identity;
use crate::domain::{Exercise, ExerciseRoutine, RoutineDate, UserProfile};
use crate::error::{Error, Result};
use crate::generator::{GenerationRequest, RoutineGenerator};
use crate::store::{DatedRoutine, DocumentStore, ProfileStore, RoutineStore};
use crate::trainer::{TokenUsage, Trainer};

pub struct App {
    identity: Arc<Identity>,
    profiles: ProfileStore,
    routines: RoutineStore,
    generator: RoutineGenerator,
}

impl App {
    pub fn new(
        identity: Arc<Identity>,
        docs: Arc<dyn DocumentStore>,
        trainer: Arc<dyn Trainer>,
    ) -> Self {
        let routines = RoutineStore::new(Arc::clone(&docs));
        Self {
            identity,
            profiles: ProfileStore::new(docs),
            generator: RoutineGenerator::new(trainer, routines.clone()),
            routines,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn trainer(&self) -> &dyn Trainer {
        self.generator.trainer()
    }

    pub fn usage(&self) -> TokenUsage {
        self.generator.usage()
    }

    // --- profile ---

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let user = self.identity.require()?;
        self.profiles.save(&user, profile).await
    }

    /// The signed-in user's profile. `None` when signed out or not yet saved.
    pub async fn profile(&self) -> Result<Option<UserProfile>> {
        match self.identity.current() {
            Some(user) => self.profiles.load(&user).await,
            None => Ok(None),
        }
    }

    /// See [`ProfileStore::follow`].
    pub fn follow_profile(
        &self,
    ) -> impl Stream<Item = Result<Option<UserProfile>>> + Send + 'static {
        self.profiles.follow(self.identity.subscribe())
    }

    // --- routines ---

    pub async fn routine_for(&self, date: RoutineDate) -> Result<Option<ExerciseRoutine>> {
        let user = self.identity.require()?;
        self.routines.load(&user, date).await
    }

    /// Every saved routine, newest day first.
    pub async fn history(&self) -> Result<Vec<DatedRoutine>> {
        let user = self.identity.require()?;
        self.routines.list_all(&user).await
    }

    /// Generate a routine from the saved profile and store it for `date`,
    /// replacing whatever was there.
    pub async fn generate_for(
        &self,
        date: RoutineDate,
        available_minutes: u32,
    ) -> Result<ExerciseRoutine> {
        let user = self.identity.require()?;
        let profile = self
            .profiles
            .load(&user)
            .await?
            .ok_or_else(|| Error::invalid("complete your profile before generating a routine"))?;

        let request = GenerationRequest::from_profile(&profile, &user, available_minutes, date);
        let routine = self.generator.generate(&request, date).await?;
        self.routines.save(&user, date, &routine).await?;
        info!(%user, %date, "generated routine stored");
        Ok(routine)
    }

    /// Flip exercise `index` between not started and fully done.
    pub async fn toggle_completion(&self, date: RoutineDate, index: usize) -> Result<Exercise> {
        self.mutate(date, |routine| routine.toggle_completion(index).cloned())
            .await
    }

    /// Record `count` completed sets for exercise `index` (capped at its sets).
    pub async fn set_completed(
        &self,
        date: RoutineDate,
        index: usize,
        count: u32,
    ) -> Result<Exercise> {
        self.mutate(date, |routine| routine.set_completed(index, count).cloned())
            .await
    }

    pub async fn add_exercise(&self, date: RoutineDate, exercise: Exercise) -> Result<ExerciseRoutine> {
        exercise.validate()?;
        let ((), routine) = self
            .mutate_routine(date, |routine| routine.add_exercise(exercise))
            .await?;
        Ok(routine)
    }

    pub async fn remove_exercise(&self, date: RoutineDate, index: usize) -> Result<Exercise> {
        self.mutate(date, |routine| routine.remove_exercise(index))
            .await
    }

    async fn mutate<T: Send>(
        &self,
        date: RoutineDate,
        change: impl FnOnce(&mut ExerciseRoutine) -> Result<T> + Send,
    ) -> Result<T> {
        let (outcome, _) = self.mutate_routine(date, change).await?;
        Ok(outcome)
    }

    async fn mutate_routine<T: Send>(
        &self,
        date: RoutineDate,
        change: impl FnOnce(&mut ExerciseRoutine) -> Result<T> + Send,
    ) -> Result<(T, ExerciseRoutine)> {
        let user = self.identity.require()?;
        self.routines
            .update(&user, date, change)
            .await?
            .ok_or_else(|| Error::invalid(format!("no routine for {date}; generate one first")))
    }
}
