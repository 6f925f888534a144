//! The generation contract: what goes in, what must come back.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::routine::MAX_SETS;
use crate::domain::{
    ActivityLevel, Exercise, ExerciseRoutine, Gender, RoutineDate, UserId, UserProfile, age_on,
};
use crate::error::{Error, Result};

/// Input to routine generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub fitness_goal: String,
    /// Minutes available for the workout.
    pub available_time: u32,
    /// Whole years. Zero or negative means the birth date was unusable.
    pub age: i32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub user_id: UserId,
}

impl GenerationRequest {
    /// Derive the request from a saved profile, with age computed on `on`.
    pub fn from_profile(
        profile: &UserProfile,
        user: &UserId,
        available_minutes: u32,
        on: RoutineDate,
    ) -> Self {
        Self {
            fitness_goal: profile.exercise_goal.as_str().to_string(),
            available_time: available_minutes,
            age: age_on(profile.date_of_birth, on.date()),
            gender: profile.gender,
            activity_level: profile.activity_level,
            user_id: user.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.age <= 0 {
            return Err(Error::invalid(format!(
                "age must be positive (got {}); check the date of birth in your profile",
                self.age
            )));
        }
        if self.available_time == 0 {
            return Err(Error::invalid("available time must be at least one minute"));
        }
        if self.fitness_goal.trim().is_empty() {
            return Err(Error::invalid("fitness goal must not be empty"));
        }
        Ok(())
    }
}

/// JSON Schema the model's answer must satisfy.
pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "routine": {
                "type": "array",
                "description": "The generated exercise routine, in the order to perform it.",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "properties": {
                        "exerciseName": {"type": "string", "description": "The name of the exercise."},
                        "sets": {"type": "integer", "minimum": 1, "maximum": MAX_SETS, "description": "The number of sets."},
                        "reps": {"type": "string", "description": "Repetitions per set, e.g. 8-12."},
                        "restTime": {"type": "string", "description": "Rest between sets, e.g. 60 seconds."},
                        "completed": {"type": "integer", "minimum": 0, "description": "Sets completed so far. Always 0."}
                    },
                    "required": ["exerciseName", "sets", "reps", "restTime"],
                    "additionalProperties": false
                }
            },
            "notes": {"type": "string", "description": "Recommendations or additional information for the user."}
        },
        "required": ["routine"],
        "additionalProperties": false
    })
}

/// Some models answer `completed` with the old boolean flag.
#[derive(Deserialize)]
#[serde(untagged)]
enum CompletedField {
    Count(u32),
    Flag(bool),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExercise {
    exercise_name: String,
    sets: u32,
    reps: String,
    rest_time: String,
    completed: Option<CompletedField>,
}

#[derive(Deserialize)]
struct RawRoutine {
    routine: Vec<RawExercise>,
    notes: Option<String>,
}

/// Parse and check a model reply. Anything that does not fit the schema is
/// [`Error::InvalidResponse`]; nothing partial is returned.
pub fn parse_routine(text: &str) -> Result<ExerciseRoutine> {
    let json = extract_json(text);
    let raw: RawRoutine = serde_json::from_str(json)
        .map_err(|e| Error::InvalidResponse(format!("{e}\nraw: {text}")))?;

    if raw.routine.is_empty() {
        return Err(Error::InvalidResponse(
            "routine contains no exercises".to_string(),
        ));
    }

    let exercises = raw
        .routine
        .into_iter()
        .enumerate()
        .map(|(i, item)| -> Result<Exercise> {
            let completed = match item.completed {
                None | Some(CompletedField::Flag(false)) => 0,
                Some(CompletedField::Flag(true)) => item.sets,
                Some(CompletedField::Count(n)) => n,
            };
            let exercise = Exercise {
                name: item.exercise_name.trim().to_string(),
                sets: item.sets,
                reps: item.reps.trim().to_string(),
                rest_time: item.rest_time.trim().to_string(),
                completed,
            };
            exercise
                .validate()
                .map_err(|e| Error::InvalidResponse(format!("exercise #{}: {e}", i + 1)))?;
            Ok(exercise)
        })
        .collect::<Result<Vec<_>>>()?;

    let notes = raw.notes.filter(|n| !n.trim().is_empty());
    Ok(ExerciseRoutine::new(exercises, notes))
}

/// Extract JSON from text that may be wrapped in markdown code fences.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(after) = trimmed.strip_prefix("```json")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }
    if let Some(after) = trimmed.strip_prefix("```")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }

    trimmed
}
