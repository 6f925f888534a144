use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, report};
use crate::domain::UserId;

pub struct LoginCommand;

#[async_trait]
impl Command for LoginCommand {
    fn name(&self) -> &str {
        "/login"
    }

    fn usage(&self) -> &str {
        "<user-id>"
    }

    fn description(&self) -> &str {
        "sign in as a user"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let result = UserId::new(args).and_then(|user| {
            info.app.identity().login(user.clone())?;
            Ok(user)
        });
        match result {
            Ok(user) => println!("  ✓ logged in as {user}"),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}
