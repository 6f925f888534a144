use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, report};
use crate::display::format_routine;

pub struct TodayCommand;

#[async_trait]
impl Command for TodayCommand {
    fn name(&self) -> &str {
        "/today"
    }

    fn description(&self) -> &str {
        "show today's routine"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        match info.app.routine_for(info.today).await {
            Ok(Some(routine)) => print!("{}", format_routine(info.today, &routine)),
            Ok(None) => println!("  no routine for {} yet, try /generate", info.today),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{TestSession, session_with_routine, test_session};

    #[tokio::test]
    async fn handled_with_and_without_routine() {
        let session = test_session();
        assert!(matches!(
            TodayCommand.execute("", &session.info()).await,
            CommandResult::Handled
        ));
        let session = session_with_routine().await;
        assert!(matches!(
            TodayCommand.execute("", &session.info()).await,
            CommandResult::Handled
        ));
    }

    #[tokio::test]
    async fn signed_out_is_handled() {
        let session = TestSession::signed_out();
        assert!(matches!(
            TodayCommand.execute("", &session.info()).await,
            CommandResult::Handled
        ));
    }
}
