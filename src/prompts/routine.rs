use crate::generator::GenerationRequest;
use crate::generator::history::ExerciseHistoryEntry;

const INTRO: &str = "You are a fitness expert specializing in personalized exercise routines.";
const GUIDANCE: &str = "Drawing on Peter Attia's research on longevity and healthspan, design an exercise routine that balances strength, stability, and cardiovascular work for this person.";
const HISTORY_HEADER: &str = "Exercise History (most recent first):";
const NO_HISTORY: &str = "- none recorded";
const RULES_HEADER: &str = "Rules:";
const RULES: &[&str] = &[
    "Fit the whole routine, including rest between sets, into the available time.",
    "Use the exercise history to vary the stimulus: avoid repeating the same muscle groups on consecutive days.",
    "Progress gradually from what was done recently rather than jumping in volume.",
    "Choose exercises appropriate for the person's age and activity level.",
    "Every exercise starts with 0 completed sets.",
    "Put recommendations or safety notes in the notes field.",
];

pub fn build_routine_prompt(
    request: &GenerationRequest,
    history: &[ExerciseHistoryEntry],
) -> String {
    let history_desc = if history.is_empty() {
        NO_HISTORY.to_string()
    } else {
        history
            .iter()
            .map(|entry| {
                format!(
                    "- {}: {} sets of {} reps ({})",
                    entry.exercise_name, entry.sets, entry.reps, entry.days_ago
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let rules = RULES
        .iter()
        .map(|rule| format!("- {rule}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{INTRO}\n{GUIDANCE}\n\n\
         Fitness Goal: {goal}\n\
         Available Time: {minutes} minutes\n\
         Age: {age}\n\
         Gender: {gender}\n\
         Activity Level: {activity}\n\n\
         {HISTORY_HEADER}\n{history_desc}\n\n\
         {RULES_HEADER}\n{rules}\n",
        goal = request.fitness_goal,
        minutes = request.available_time,
        age = request.age,
        gender = request.gender,
        activity = request.activity_level,
    )
}
