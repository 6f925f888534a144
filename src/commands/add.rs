use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, report};
use crate::display::format_routine;
use crate::domain::Exercise;
use crate::error::{Error, Result};

pub struct AddCommand;

#[async_trait]
impl Command for AddCommand {
    fn name(&self) -> &str {
        "/add"
    }

    fn usage(&self) -> &str {
        "<name>;<sets>;<reps>;<rest>"
    }

    fn description(&self) -> &str {
        "append an exercise to today's routine"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let result = match parse_exercise(args) {
            Ok(exercise) => info.app.add_exercise(info.today, exercise).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(routine) => print!("{}", format_routine(info.today, &routine)),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}

/// `name;sets;reps;rest`, e.g. `Lunges;3;10 each leg;60 seconds`.
fn parse_exercise(args: &str) -> Result<Exercise> {
    let fields: Vec<&str> = args.split(';').map(str::trim).collect();
    let [name, sets, reps, rest] = fields.as_slice() else {
        return Err(Error::invalid("usage: /add <name>;<sets>;<reps>;<rest>"));
    };
    let sets = sets
        .parse()
        .map_err(|_| Error::invalid(format!("sets must be a whole number, got {sets:?}")))?;
    Exercise::new(*name, sets, *reps, *rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::session_with_routine;

    #[test]
    fn parses_fields() {
        let exercise = parse_exercise("Lunges; 3 ;10 each leg; 60 seconds").unwrap();
        assert_eq!(exercise.name, "Lunges");
        assert_eq!(exercise.sets, 3);
        assert_eq!(exercise.reps, "10 each leg");
        assert_eq!(exercise.rest_time, "60 seconds");
        assert_eq!(exercise.completed, 0);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_exercise("Lunges;3;10").is_err());
        assert!(parse_exercise("Lunges;three;10;60s").is_err());
        assert!(parse_exercise(";3;10;60s").is_err());
        assert!(parse_exercise("Lunges;0;10;60s").is_err());
    }

    #[tokio::test]
    async fn appends_to_routine() {
        let session = session_with_routine().await;
        let info = session.info();
        AddCommand.execute("Lunges;3;10;60 seconds", &info).await;
        let routine = session.app.routine_for(info.today).await.unwrap().unwrap();
        assert_eq!(routine.len(), 4);
        assert_eq!(routine.exercises[3].name, "Lunges");
    }
}
