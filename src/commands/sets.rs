use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, parse_index, report};
use crate::display::format_exercise;
use crate::error::{Error, Result};

pub struct SetsCommand;

#[async_trait]
impl Command for SetsCommand {
    fn name(&self) -> &str {
        "/sets"
    }

    fn usage(&self) -> &str {
        "<n> <count>"
    }

    fn description(&self) -> &str {
        "record how many sets of exercise n are done"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let result = match parse_args(args) {
            Ok((index, count)) => info.app.set_completed(info.today, index, count).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(exercise) => println!("  {}", format_exercise(&exercise)),
            Err(e) => report(&e),
        }
        CommandResult::Handled
    }
}

fn parse_args(args: &str) -> Result<(usize, u32)> {
    let mut parts = args.split_whitespace();
    let (Some(index), Some(count), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::invalid("usage: /sets <n> <count>"));
    };
    let count = count
        .parse()
        .map_err(|_| Error::invalid(format!("set count must be a whole number, got {count:?}")))?;
    Ok((parse_index(index)?, count))
}
