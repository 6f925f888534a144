use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, parse_index, report};

pub struct RemoveCommand;

#[async_trait]
impl Command for RemoveCommand {
    fn name(&self) -> &str {
        "/remove"
    }

    fn usage(&self) -> &str {
        "<n>"
    }

    fn description(&self) -> &str {
        "remove exercise n from today's routine"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let result = match parse_index(args) {
            Ok(index) => info.app.remove_exercise(info.today, index).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(exercise) => println!("  ✓ removed {}", exercise.name),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::session_with_routine;

    #[tokio::test]
    async fn removes_and_keeps_order() {
        let session = session_with_routine().await;
        let info = session.info();
        RemoveCommand.execute("1", &info).await;
        let routine = session.app.routine_for(info.today).await.unwrap().unwrap();
        let names: Vec<&str> = routine.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Row", "Plank"]);
    }
}
