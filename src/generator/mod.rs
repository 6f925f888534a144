//! Routine generation: profile + recent history in, validated routine out.

pub mod history;
pub mod schema;

use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

pub use schema::{GenerationRequest, output_schema, parse_routine};

use crate::consts::{GENERATE_ENDPOINT, HISTORY_DOCUMENT_LIMIT};
use crate::domain::{ExerciseRoutine, RoutineDate};
use crate::error::Result;
use crate::prompts::routine::build_routine_prompt;
use crate::store::RoutineStore;
use crate::trainer::{Completion, TokenUsage, Trainer};
use history::ExerciseHistoryEntry;

/// Wires a [`Trainer`] to the routine history it learns from.
pub struct RoutineGenerator {
    trainer: Arc<dyn Trainer>,
    routines: RoutineStore,
    usage: Mutex<TokenUsage>,
}

impl RoutineGenerator {
    pub fn new(trainer: Arc<dyn Trainer>, routines: RoutineStore) -> Self {
        Self {
            trainer,
            routines,
            usage: Mutex::new(TokenUsage::default()),
        }
    }

    pub fn trainer(&self) -> &dyn Trainer {
        self.trainer.as_ref()
    }

    /// Tokens spent by this generator so far.
    pub fn usage(&self) -> TokenUsage {
        *self.usage.lock().unwrap()
    }

    /// Generate a routine for `request`. Nothing is persisted here.
    ///
    /// The request is validated before the model is called; a model failure
    /// is [`Error::Generation`](crate::error::Error::Generation) and a reply
    /// that does not fit the schema is
    /// [`Error::InvalidResponse`](crate::error::Error::InvalidResponse).
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        today: RoutineDate,
    ) -> Result<ExerciseRoutine> {
        request.validate()?;

        let history = self.history(request, today).await;
        let completion = Completion {
            prompt: build_routine_prompt(request, &history),
            schema: output_schema(),
        };
        info!(
            endpoint = GENERATE_ENDPOINT,
            user = %request.user_id,
            provider = self.trainer.provider(),
            model = self.trainer.model(),
            history = history.len(),
            "generating routine"
        );

        let reply = self.trainer.complete(&completion).await.map_err(|e| {
            error!(endpoint = GENERATE_ENDPOINT, "model call failed: {e}");
            e
        })?;
        if let Some(usage) = reply.usage {
            self.usage.lock().unwrap().add(usage);
        }

        let routine = parse_routine(&reply.text).map_err(|e| {
            warn!(endpoint = GENERATE_ENDPOINT, "rejected model reply: {e}");
            e
        })?;
        debug!(exercises = routine.len(), "routine generated");
        Ok(routine)
    }

    /// Recent history for the prompt. A failed read degrades to no history.
    async fn history(
        &self,
        request: &GenerationRequest,
        today: RoutineDate,
    ) -> Vec<ExerciseHistoryEntry> {
        match self
            .routines
            .list_recent(&request.user_id, HISTORY_DOCUMENT_LIMIT)
            .await
        {
            Ok(routines) => history::flatten(&routines, today),
            Err(e) => {
                warn!(user = %request.user_id, "could not read exercise history: {e}");
                Vec::new()
            }
        }
    }
}
