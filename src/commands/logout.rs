use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, report};

pub struct LogoutCommand;

#[async_trait]
impl Command for LogoutCommand {
    fn name(&self) -> &str {
        "/logout"
    }

    fn description(&self) -> &str {
        "sign out"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let identity = info.app.identity();
        let Some(user) = identity.current() else {
            println!("  not logged in");
            return CommandResult::Handled;
        };
        match identity.logout() {
            Ok(()) => println!("  ✓ logged out {user}"),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{TestSession, test_session};

    #[tokio::test]
    async fn signs_out() {
        let session = test_session();
        assert!(session.app.identity().current().is_some());
        LogoutCommand.execute("", &session.info()).await;
        assert!(session.app.identity().current().is_none());
    }

    #[tokio::test]
    async fn signed_out_is_handled() {
        let session = TestSession::signed_out();
        assert!(matches!(
            LogoutCommand.execute("", &session.info()).await,
            CommandResult::Handled
        ));
    }
}
