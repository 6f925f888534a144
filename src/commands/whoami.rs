use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct WhoamiCommand;

#[async_trait]
impl Command for WhoamiCommand {
    fn name(&self) -> &str {
        "/whoami"
    }

    fn description(&self) -> &str {
        "show the signed-in user, trainer and database"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let trainer = info.app.trainer();
        match info.app.identity().current() {
            Some(user) => println!("  user      {user}"),
            None => println!("  user      not logged in"),
        }
        println!("  trainer   {} ({})", trainer.provider(), trainer.model());
        println!("  minutes   {}", info.available_minutes);
        println!("  db        {}", info.db_path);
        CommandResult::Handled
    }
}
