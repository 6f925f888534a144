use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, parse_index, report};
use crate::display::format_exercise;

pub struct DoneCommand;

#[async_trait]
impl Command for DoneCommand {
    fn name(&self) -> &str {
        "/done"
    }

    fn usage(&self) -> &str {
        "<n>"
    }

    fn description(&self) -> &str {
        "toggle exercise n between done and not started"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let result = match parse_index(args) {
            Ok(index) => info.app.toggle_completion(info.today, index).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(exercise) => println!("  {}", format_exercise(&exercise)),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}
