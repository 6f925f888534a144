//! Built-in REPL commands prefixed with `/`.
//!
//! Commands implement the [`Command`] trait and are registered in a
//! [`CommandRegistry`]. The registry splits the command word from its
//! arguments, resolves aliases and generates `/help`.

mod add;
mod done;
mod generate;
mod help;
mod history;
mod login;
mod logout;
mod profile;
mod quit;
mod remove;
mod sets;
mod today;
mod tokens;
mod whoami;

use async_trait::async_trait;
use std::sync::Arc;

use crate::app::App;
use crate::domain::RoutineDate;
use crate::error::{Error, Result};

/// Session state available to commands during execution.
pub struct SessionInfo<'a> {
    pub app: &'a App,
    /// The day routine commands act on.
    pub today: RoutineDate,
    pub available_minutes: u32,
    pub db_path: &'a str,
}

/// What the REPL should do after a command runs.
pub enum CommandResult {
    /// Not a command. The REPL prints a hint.
    NotACommand,
    /// Command handled, continue the REPL loop.
    Handled,
    /// Exit the REPL.
    Quit,
}

/// A REPL command.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/done"`.
    fn name(&self) -> &str;

    /// Alternative names, e.g. `&["/h", "/?"]`.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Argument synopsis for `/help`, e.g. `"<n>"`.
    fn usage(&self) -> &str {
        ""
    }

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    /// Run the command. `args` is everything after the command word, trimmed.
    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult;
}

pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands.
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(whoami::WhoamiCommand),
            Arc::new(profile::ProfileCommand),
            Arc::new(today::TodayCommand),
            Arc::new(generate::GenerateCommand),
            Arc::new(done::DoneCommand),
            Arc::new(sets::SetsCommand),
            Arc::new(add::AddCommand),
            Arc::new(remove::RemoveCommand),
            Arc::new(history::HistoryCommand),
            Arc::new(tokens::TokensCommand),
            Arc::new(login::LoginCommand),
            Arc::new(logout::LogoutCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    /// Dispatch input to a matching command, or return `NotACommand`.
    pub async fn dispatch(&self, input: &str, info: &SessionInfo<'_>) -> CommandResult {
        let input = input.trim();
        let (word, args) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };

        for command in &self.commands {
            if word == command.name() || command.aliases().contains(&word) {
                // /help needs the registry to list all commands
                if command.name() == "/help" {
                    print!("{}", self.help_text());
                    return CommandResult::Handled;
                }
                return command.execute(args, info).await;
            }
        }

        if word.starts_with('/') {
            println!("unknown command: {word}");
            println!("type /help for available commands");
            return CommandResult::Handled;
        }

        CommandResult::NotACommand
    }

    /// Generate help text from all registered commands.
    pub fn help_text(&self) -> String {
        let entries: Vec<(String, &str)> = self
            .commands
            .iter()
            .map(|c| (format_label(c.name(), c.usage(), c.aliases()), c.description()))
            .collect();

        let max_width = entries
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(10);

        let mut out = String::new();
        for (label, desc) in &entries {
            out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
        }
        out
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// All registered names and aliases (for duplicate detection).
    pub fn all_triggers(&self) -> Vec<&str> {
        let mut triggers = Vec::new();
        for cmd in &self.commands {
            triggers.push(cmd.name());
            triggers.extend_from_slice(cmd.aliases());
        }
        triggers
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn format_label(name: &str, usage: &str, aliases: &[&str]) -> String {
    let mut label = name.to_string();
    if !usage.is_empty() {
        label.push(' ');
        label.push_str(usage);
    }
    if !aliases.is_empty() {
        label.push_str(&format!(" ({})", aliases.join(", ")));
    }
    label
}

/// Print a failed action. The REPL keeps running.
fn report(err: &Error) {
    eprintln!("  ✗ {err}");
}

/// Parse a 1-based exercise number into a 0-based index.
fn parse_index(arg: &str) -> Result<usize> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(Error::invalid(format!(
            "expected an exercise number starting at 1, got {arg:?}"
        ))),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::auth::Identity;
    use crate::domain::{ActivityLevel, ExerciseGoal, Gender, UserId, UserProfile};
    use crate::store::sqlite::SqliteDocuments;
    use crate::trainer::mock::MockTrainer;

    /// An in-memory app with one signed-in user and a scripted trainer.
    pub(crate) struct TestSession {
        pub app: App,
    }

    impl TestSession {
        pub fn new(trainer: MockTrainer) -> Self {
            let identity = Arc::new(Identity::open(":memory:").unwrap());
            identity.login(UserId::new("tester").unwrap()).unwrap();
            let docs = Arc::new(SqliteDocuments::in_memory().unwrap());
            Self {
                app: App::new(identity, docs, Arc::new(trainer)),
            }
        }

        pub fn signed_out() -> Self {
            let session = Self::new(MockTrainer::new(vec![]));
            session.app.identity().logout().unwrap();
            session
        }

        pub fn info(&self) -> SessionInfo<'_> {
            SessionInfo {
                app: &self.app,
                today: "2024-05-10".parse().unwrap(),
                available_minutes: 45,
                db_path: ":memory:",
            }
        }
    }

    pub(crate) fn test_session() -> TestSession {
        TestSession::new(MockTrainer::new(vec![]))
    }

    pub(crate) const ROUTINE_REPLY: &str = r#"{"routine":[
        {"exerciseName":"Squat","sets":3,"reps":"10","restTime":"60 seconds"},
        {"exerciseName":"Row","sets":3,"reps":"12","restTime":"60 seconds"},
        {"exerciseName":"Plank","sets":2,"reps":"30s","restTime":"30 seconds"}
    ]}"#;

    pub(crate) fn test_profile() -> UserProfile {
        UserProfile {
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            weight_kg: 70.0,
            height_cm: 175.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::ModeratelyActive,
            exercise_goal: ExerciseGoal::GeneralFitness,
            age_related_conditions: Default::default(),
        }
    }

    /// A session whose user has a profile and a three-exercise routine today.
    pub(crate) async fn session_with_routine() -> TestSession {
        let session = TestSession::new(MockTrainer::replying(ROUTINE_REPLY));
        session.app.save_profile(&test_profile()).await.unwrap();
        let today = session.info().today;
        session.app.generate_for(today, 45).await.unwrap();
        session
    }

    #[test]
    fn all_builtins_registered() {
        let reg = CommandRegistry::new();
        let names = reg.names();
        for name in [
            "/help", "/whoami", "/profile", "/today", "/generate", "/done", "/sets", "/add",
            "/remove", "/history", "/tokens", "/login", "/logout", "/quit",
        ] {
            assert!(names.contains(&name), "missing: {name}");
        }
    }

    #[test]
    fn no_duplicate_triggers() {
        let reg = CommandRegistry::new();
        let triggers = reg.all_triggers();
        let mut seen = Vec::new();
        for t in &triggers {
            assert!(!seen.contains(t), "duplicate trigger: {t}");
            seen.push(t);
        }
    }

    #[test]
    fn help_text_includes_all_commands() {
        let reg = CommandRegistry::new();
        let text = reg.help_text();
        for name in reg.names() {
            assert!(text.contains(name), "help missing: {name}");
        }
        assert!(text.contains("/h"));
        assert!(text.contains("/done <n>"));
    }

    #[tokio::test]
    async fn unknown_slash_command_is_handled() {
        let session = test_session();
        let reg = CommandRegistry::new();
        assert!(matches!(
            reg.dispatch("/foobar", &session.info()).await,
            CommandResult::Handled
        ));
    }

    #[tokio::test]
    async fn non_command_passes_through() {
        let session = test_session();
        let reg = CommandRegistry::new();
        assert!(matches!(
            reg.dispatch("squats please", &session.info()).await,
            CommandResult::NotACommand
        ));
    }

    #[tokio::test]
    async fn arguments_are_split_from_the_command_word() {
        let session = test_session();
        let reg = CommandRegistry::new();
        assert!(matches!(
            reg.dispatch("  /quit   now ", &session.info()).await,
            CommandResult::Quit
        ));
    }

    #[test]
    fn format_label_variants() {
        assert_eq!(format_label("/whoami", "", &[]), "/whoami");
        assert_eq!(format_label("/help", "", &["/h", "/?"]), "/help (/h, /?)");
        assert_eq!(format_label("/done", "<n>", &[]), "/done <n>");
    }

    #[test]
    fn indices_are_one_based() {
        assert_eq!(parse_index("1").unwrap(), 0);
        assert_eq!(parse_index("12").unwrap(), 11);
        assert!(parse_index("0").is_err());
        assert!(parse_index("-1").is_err());
        assert!(parse_index("two").is_err());
    }
}
