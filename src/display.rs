//! Plain-text rendering of routines, history and profiles for the terminal.

use crate::domain::{Exercise, ExerciseRoutine, RoutineDate, UserProfile, age_on};
use crate::generator::history::days_ago_label;
use crate::store::DatedRoutine;

/// A routine as a numbered checklist. Numbers are the 1-based indices the
/// REPL commands take.
pub fn format_routine(date: RoutineDate, routine: &ExerciseRoutine) -> String {
    let (done, total) = routine.progress();
    let mut out = format!("  routine for {date}  ({done}/{total} sets done)\n");
    for (i, exercise) in routine.exercises.iter().enumerate() {
        out.push_str(&format!("  {:>2}. {}\n", i + 1, format_exercise(exercise)));
    }
    if let Some(notes) = &routine.notes {
        out.push_str(&format!("\n  notes: {notes}\n"));
    }
    out
}

pub fn format_exercise(exercise: &Exercise) -> String {
    let mark = if exercise.is_done() {
        "[✓]"
    } else if exercise.completed > 0 {
        "[~]"
    } else {
        "[ ]"
    };
    format!(
        "{mark} {}  {} x {}, rest {}  ({}/{})",
        exercise.name,
        exercise.sets,
        exercise.reps,
        exercise.rest_time,
        exercise.completed,
        exercise.sets,
    )
}

/// One line per stored day, newest first.
pub fn format_history(routines: &[DatedRoutine], today: RoutineDate) -> String {
    if routines.is_empty() {
        return "  no routines saved yet\n".to_string();
    }
    let mut out = String::new();
    for dated in routines {
        let (done, total) = dated.routine.progress();
        let names = dated
            .routine
            .exercises
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "  {}  {:<12}  {done}/{total} sets  {names}\n",
            dated.date,
            days_ago_label(today.days_from(dated.date)),
        ));
    }
    out
}

pub fn format_profile(profile: &UserProfile, today: RoutineDate) -> String {
    let mut out = format!(
        "  born      {} (age {})\n  weight    {} kg\n  height    {} cm\n  gender    {}\n  activity  {}\n  goal      {}\n",
        profile.date_of_birth,
        age_on(profile.date_of_birth, today.date()),
        profile.weight_kg,
        profile.height_cm,
        profile.gender,
        profile.activity_level,
        profile.exercise_goal,
    );
    if !profile.age_related_conditions.is_empty() {
        let conditions = profile
            .age_related_conditions
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  conditions {conditions}\n"));
    }
    out
}
