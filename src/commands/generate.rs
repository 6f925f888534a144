use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, report};
use crate::display::format_routine;
use crate::spinner::Spinner;

pub struct GenerateCommand;

#[async_trait]
impl Command for GenerateCommand {
    fn name(&self) -> &str {
        "/generate"
    }

    fn description(&self) -> &str {
        "generate today's routine from your profile (replaces any existing one)"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let generated = Spinner::run(
            "planning your routine",
            info.app.generate_for(info.today, info.available_minutes),
        )
        .await;
        match generated {
            Ok(routine) => print!("{}", format_routine(info.today, &routine)),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}
