use serde::{Deserialize, Serialize};

use crate::domain::RoutineDate;
use crate::store::DatedRoutine;

/// A past exercise, summarized for the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseHistoryEntry {
    pub exercise_name: String,
    pub sets: u32,
    pub reps: String,
    /// e.g. `"1 day ago"`, `"3 days ago"`.
    pub days_ago: String,
}

/// Flatten stored routines (newest first) into history entries, labelled
/// relative to `today`.
pub fn flatten(routines: &[DatedRoutine], today: RoutineDate) -> Vec<ExerciseHistoryEntry> {
    routines
        .iter()
        .flat_map(|dated| {
            let label = days_ago_label(today.days_from(dated.date));
            dated
                .routine
                .exercises
                .iter()
                .map(move |exercise| ExerciseHistoryEntry {
                    exercise_name: exercise.name.clone(),
                    sets: exercise.sets,
                    reps: exercise.reps.clone(),
                    days_ago: label.clone(),
                })
        })
        .collect()
}

pub fn days_ago_label(days: u64) -> String {
    if days == 1 {
        "1 day ago".to_string()
    } else {
        format!("{days} days ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Exercise, ExerciseRoutine};

    fn dated(date: &str, names: &[&str]) -> DatedRoutine {
        DatedRoutine {
            date: date.parse().unwrap(),
            routine: ExerciseRoutine::new(
                names
                    .iter()
                    .map(|n| Exercise::new(*n, 3, "10", "60 seconds").unwrap())
                    .collect(),
                None,
            ),
        }
    }

    #[test]
    fn labels() {
        assert_eq!(days_ago_label(0), "0 days ago");
        assert_eq!(days_ago_label(1), "1 day ago");
        assert_eq!(days_ago_label(12), "12 days ago");
    }

    #[test]
    fn flattens_in_order_with_labels() {
        let today: RoutineDate = "2024-05-10".parse().unwrap();
        let routines = vec![
            dated("2024-05-09", &["Squat", "Row"]),
            dated("2024-05-07", &["Deadlift"]),
        ];
        let history = flatten(&routines, today);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].exercise_name, "Squat");
        assert_eq!(history[0].days_ago, "1 day ago");
        assert_eq!(history[1].exercise_name, "Row");
        assert_eq!(history[2].exercise_name, "Deadlift");
        assert_eq!(history[2].days_ago, "3 days ago");
        assert_eq!(history[2].sets, 3);
        assert_eq!(history[2].reps, "10");
    }

    #[test]
    fn todays_routine_counts_as_zero_days() {
        let today: RoutineDate = "2024-05-10".parse().unwrap();
        let history = flatten(&[dated("2024-05-10", &["Plank"])], today);
        assert_eq!(history[0].days_ago, "0 days ago");
    }

    #[test]
    fn empty_routines_give_empty_history() {
        let today: RoutineDate = "2024-05-10".parse().unwrap();
        assert!(flatten(&[], today).is_empty());
    }
}
