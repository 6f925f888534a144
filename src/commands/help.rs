use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

/// Listed in `/help`; the registry renders the text itself.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "show this help"
    }

    async fn execute(&self, _args: &str, _info: &SessionInfo<'_>) -> CommandResult {
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandRegistry;
    use crate::commands::tests::test_session;

    #[tokio::test]
    async fn aliases_dispatch_to_help() {
        let session = test_session();
        let reg = CommandRegistry::new();
        for trigger in ["/help", "/h", "/?"] {
            assert!(matches!(
                reg.dispatch(trigger, &session.info()).await,
                CommandResult::Handled
            ));
        }
    }
}
