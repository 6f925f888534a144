use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, report};
use crate::display::format_history;

pub struct HistoryCommand;

#[async_trait]
impl Command for HistoryCommand {
    fn name(&self) -> &str {
        "/history"
    }

    fn description(&self) -> &str {
        "list saved routines, newest first"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        match info.app.history().await {
            Ok(routines) => print!("{}", format_history(&routines, info.today)),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}
