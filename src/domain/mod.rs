//! Core fitness types: who the user is, what they did, and on which day.

pub mod profile;
pub mod routine;

pub use profile::{ActivityLevel, AgeRelatedCondition, ExerciseGoal, Gender, UserProfile};
pub use routine::{Exercise, ExerciseRoutine};

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identity handed to us by the auth provider.
///
/// Used verbatim as a document path segment, so it may not be empty or
/// contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid("user id must not be empty"));
        }
        if trimmed.contains('/') {
            return Err(Error::invalid(format!("user id may not contain '/': {trimmed}")));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar day in `YYYY-MM-DD` form.
///
/// The string form is the routine document id. Because the format is fixed
/// width, sorting the strings sorts the days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutineDate(NaiveDate);

impl RoutineDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole days between `self` and `other`, ignoring direction.
    pub fn days_from(&self, other: RoutineDate) -> u64 {
        (self.0 - other.0).num_days().unsigned_abs()
    }
}

impl FromStr for RoutineDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid(format!("expected a YYYY-MM-DD date, got {s:?}"));
        let date = NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| invalid())?;
        // chrono accepts signs and unpadded fields; a document id is only
        // valid in the exact form it is written back out as
        if date.format(DATE_FORMAT).to_string() != s {
            return Err(invalid());
        }
        Ok(Self(date))
    }
}

impl TryFrom<String> for RoutineDate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<RoutineDate> for String {
    fn from(date: RoutineDate) -> Self {
        date.to_string()
    }
}

impl fmt::Display for RoutineDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Completed years between `date_of_birth` and `on`.
///
/// Negative or zero for a birth date on or after `on`; callers treat that
/// as an invalid birth date.
pub fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}
