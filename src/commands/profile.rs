use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, report};
use crate::display::format_profile;

pub struct ProfileCommand;

#[async_trait]
impl Command for ProfileCommand {
    fn name(&self) -> &str {
        "/profile"
    }

    fn description(&self) -> &str {
        "show your profile (edit with `coach profile set`)"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if info.app.identity().current().is_none() {
            println!("  not logged in, try /login <user-id>");
            return CommandResult::Handled;
        }
        match info.app.profile().await {
            Ok(Some(profile)) => print!("{}", format_profile(&profile, info.today)),
            Ok(None) => println!("  no profile yet, run `coach profile set --help`"),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}
