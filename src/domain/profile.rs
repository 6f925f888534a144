use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declares a string-backed enum: serde names, `as_str`, `Display`,
/// `FromStr` and the list of all variants, from one table.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => {
                        let expected = Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>();
                        Err(Error::invalid(format!(
                            "unknown {} {other:?} (expected one of: {})",
                            stringify!($name),
                            expected.join(", ")
                        )))
                    }
                }
            }
        }
    };
}

wire_enum! {
    Gender {
        Male => "male",
        Female => "female",
        Other => "other",
    }
}

wire_enum! {
    ActivityLevel {
        Sedentary => "sedentary",
        LightlyActive => "lightlyActive",
        ModeratelyActive => "moderatelyActive",
        VeryActive => "veryActive",
        ExtraActive => "extraActive",
    }
}

wire_enum! {
    ExerciseGoal {
        WeightLoss => "weight_loss",
        MuscleGain => "muscle_gain",
        GeneralFitness => "general_fitness",
        StrengthTraining => "strength_training",
        Endurance => "endurance",
    }
}

wire_enum! {
    /// Conditions offered on the profile form when gender is female.
    AgeRelatedCondition {
        Menopause => "menopause",
        Pregnancy => "pregnancy",
        Postpartum => "postpartum",
    }
}

/// Demographics and goals used as generation input. One per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "dob", alias = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub exercise_goal: ExerciseGoal,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub age_related_conditions: BTreeSet<AgeRelatedCondition>,
}

impl UserProfile {
    /// Checks the invariants the profile form enforces.
    pub fn validate(&self) -> Result<()> {
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(Error::invalid(format!(
                "weight must be a positive number of kilograms, got {}",
                self.weight_kg
            )));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(Error::invalid(format!(
                "height must be a positive number of centimetres, got {}",
                self.height_cm
            )));
        }
        if self.gender != Gender::Female && !self.age_related_conditions.is_empty() {
            return Err(Error::invalid(
                "age-related conditions only apply when gender is female",
            ));
        }
        Ok(())
    }
}
