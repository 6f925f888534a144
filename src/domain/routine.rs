use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound on sets for one exercise.
pub const MAX_SETS: u32 = 100;

/// One exercise in a day's routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(rename = "exerciseName")]
    pub name: String,
    pub sets: u32,
    /// Free text, e.g. `"10"` or `"8-12"`.
    pub reps: String,
    /// Free text, e.g. `"60 seconds"`.
    pub rest_time: String,
    /// Number of sets done so far. Never exceeds `sets`.
    #[serde(default)]
    pub completed: u32,
}

impl Exercise {
    /// A fresh, not yet started exercise.
    pub fn new(
        name: impl Into<String>,
        sets: u32,
        reps: impl Into<String>,
        rest_time: impl Into<String>,
    ) -> Result<Self> {
        let exercise = Self {
            name: name.into().trim().to_string(),
            sets,
            reps: reps.into().trim().to_string(),
            rest_time: rest_time.into().trim().to_string(),
            completed: 0,
        };
        exercise.validate()?;
        Ok(exercise)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid("exercise name must not be empty"));
        }
        if self.sets == 0 || self.sets > MAX_SETS {
            return Err(Error::invalid(format!(
                "{}: sets must be between 1 and {MAX_SETS}, got {}",
                self.name, self.sets
            )));
        }
        if self.reps.is_empty() {
            return Err(Error::invalid(format!("{}: reps must not be empty", self.name)));
        }
        if self.completed > self.sets {
            return Err(Error::invalid(format!(
                "{}: {} sets completed out of {}",
                self.name, self.completed, self.sets
            )));
        }
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.sets
    }
}

/// The routine document stored for one user on one day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExerciseRoutine {
    #[serde(rename = "routine")]
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseRoutine {
    pub fn new(exercises: Vec<Exercise>, notes: Option<String>) -> Self {
        Self { exercises, notes }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Flip exercise `index` between untouched and fully done.
    ///
    /// A partially done exercise becomes fully done.
    pub fn toggle_completion(&mut self, index: usize) -> Result<&Exercise> {
        let exercise = self.exercise_mut(index)?;
        exercise.completed = if exercise.is_done() { 0 } else { exercise.sets };
        Ok(&*exercise)
    }

    /// Record `count` completed sets for exercise `index`, capped at its set count.
    pub fn set_completed(&mut self, index: usize, count: u32) -> Result<&Exercise> {
        let exercise = self.exercise_mut(index)?;
        exercise.completed = count.min(exercise.sets);
        Ok(&*exercise)
    }

    /// Append an exercise. It always starts with nothing completed.
    pub fn add_exercise(&mut self, mut exercise: Exercise) -> Result<()> {
        exercise.completed = 0;
        exercise.validate()?;
        self.exercises.push(exercise);
        Ok(())
    }

    /// Remove exercise `index`, keeping the order of the others.
    pub fn remove_exercise(&mut self, index: usize) -> Result<Exercise> {
        self.check_index(index)?;
        Ok(self.exercises.remove(index))
    }

    /// `(completed sets, total sets)` across the routine.
    pub fn progress(&self) -> (u64, u64) {
        self.exercises.iter().fold((0, 0), |(done, total), e| {
            (done + u64::from(e.completed), total + u64::from(e.sets))
        })
    }

    fn exercise_mut(&mut self, index: usize) -> Result<&mut Exercise> {
        self.check_index(index)?;
        Ok(&mut self.exercises[index])
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.exercises.len() {
            return Err(Error::invalid(format!(
                "no exercise #{} (routine has {})",
                index + 1,
                self.exercises.len()
            )));
        }
        Ok(())
    }
}
