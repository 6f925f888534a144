use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use coach::app::App;
use coach::auth::{CredentialStore, Identity};
use coach::banner::{BannerInfo, print_banner, print_session_summary};
use coach::commands::{CommandRegistry, CommandResult, SessionInfo};
use coach::config::{Config, keys};
use coach::consts::{LOG_ENV, default_db_path};
use coach::display::{format_history, format_profile, format_routine};
use coach::domain::{
    ActivityLevel, AgeRelatedCondition, ExerciseGoal, Gender, RoutineDate, UserId, UserProfile,
};
use coach::spinner::Spinner;
use coach::store::sqlite::SqliteDocuments;
use coach::trainer::Trainer;
use coach::trainer::anthropic::{self, AnthropicTrainer};
use coach::trainer::gemini::{self, GeminiTrainer};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Provider {
    Anthropic,
    Gemini,
}

impl Provider {
    fn name(self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
        }
    }

    fn api_key_env(self) -> &'static str {
        match self {
            Provider::Anthropic => anthropic::API_KEY_ENV,
            Provider::Gemini => gemini::API_KEY_ENV,
        }
    }
}

#[derive(Parser)]
#[command(name = "coach", version, about = "A daily exercise routine, planned by a model and tracked by you.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Model provider (overrides the stored `provider` setting)
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name (provider-specific, overrides the stored `model` setting)
    #[arg(long)]
    model: Option<String>,

    /// SQLite database path (default: ~/.coach/coach.db, use :memory: for ephemeral)
    #[arg(short, long)]
    db: Option<String>,

    /// Minutes available for the workout (overrides `available_minutes`)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    minutes: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in as a user
    Login {
        user_id: String,
    },
    /// Sign out
    Logout,
    /// Store an API key for a provider, or remove it when no key is given
    Key {
        #[arg(value_enum)]
        provider: Provider,
        key: Option<String>,
    },
    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Generate today's routine (replaces any existing one)
    Generate,
    /// Show today's routine
    Today,
    /// List saved routines, newest first
    History,
    /// Read or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    /// Replace your profile
    Set(ProfileArgs),
}

#[derive(Args)]
struct ProfileArgs {
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    dob: NaiveDate,
    /// Weight in kilograms
    #[arg(long)]
    weight: f64,
    /// Height in centimetres
    #[arg(long)]
    height: f64,
    /// male, female or other
    #[arg(long)]
    gender: Gender,
    /// sedentary, lightlyActive, moderatelyActive, veryActive or extraActive
    #[arg(long)]
    activity: ActivityLevel,
    /// weight_loss, muscle_gain, general_fitness, strength_training or endurance
    #[arg(long)]
    goal: ExerciseGoal,
    /// menopause, pregnancy or postpartum (female only, repeatable)
    #[arg(long = "condition")]
    conditions: Vec<AgeRelatedCondition>,
}

impl From<ProfileArgs> for UserProfile {
    fn from(args: ProfileArgs) -> Self {
        UserProfile {
            date_of_birth: args.dob,
            weight_kg: args.weight,
            height_cm: args.height,
            gender: args.gender,
            activity_level: args.activity,
            exercise_goal: args.goal,
            age_related_conditions: args.conditions.into_iter().collect(),
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print one setting, or all of them
    Get { key: Option<String> },
    Set { key: String, value: String },
    /// Remove a setting so the default applies again
    Unset { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stderr so log lines don't interleave with REPL output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let db_path = resolve_db_path(cli.db.as_deref())?;
    let config = Config::open(&db_path)?;
    let credentials = CredentialStore::open(&db_path)?;
    let identity = Arc::new(Identity::open(&db_path)?);

    let provider = match cli.provider {
        Some(provider) => provider,
        None => match config.get(keys::PROVIDER)? {
            Some(name) => <Provider as ValueEnum>::from_str(&name, true)
                .map_err(|e| anyhow!("stored provider {name:?} is invalid: {e}"))?,
            None => Provider::Anthropic,
        },
    };
    let model = match cli.model {
        Some(model) => Some(model),
        None => config.get(keys::MODEL)?,
    };
    let available_minutes = match cli.minutes {
        Some(minutes) => minutes,
        None => config.available_minutes()?,
    };

    let trainer = build_trainer(provider, model, &credentials)?;
    let docs = Arc::new(SqliteDocuments::new(&db_path)?);
    let app = App::new(Arc::clone(&identity), docs, trainer);
    let today = RoutineDate::today();

    let Some(command) = cli.command else {
        return repl(&app, &db_path, available_minutes).await;
    };

    match command {
        Command::Login { user_id } => {
            let user = UserId::new(user_id)?;
            identity.login(user.clone())?;
            println!("✓ logged in as {user}");
        }
        Command::Logout => {
            identity.logout()?;
            println!("✓ logged out");
        }
        Command::Key { provider, key } => match key {
            Some(key) => {
                credentials.set(provider.name(), &key)?;
                println!("✓ saved {} API key", provider.name());
            }
            None => {
                credentials.remove(provider.name())?;
                println!("✓ removed {} API key", provider.name());
            }
        },
        Command::Profile { action } => match action {
            ProfileAction::Show => match app.profile().await? {
                Some(profile) => print!("{}", format_profile(&profile, today)),
                None if identity.current().is_none() => {
                    println!("not logged in, run `coach login <user-id>`")
                }
                None => println!("no profile yet, run `coach profile set --help`"),
            },
            ProfileAction::Set(args) => {
                let profile = UserProfile::from(args);
                app.save_profile(&profile).await?;
                println!("✓ profile saved");
                print!("{}", format_profile(&profile, today));
            }
        },
        Command::Generate => {
            let routine = Spinner::run(
                "planning your routine",
                app.generate_for(today, available_minutes),
            )
            .await?;
            print!("{}", format_routine(today, &routine));
        }
        Command::Today => match app.routine_for(today).await? {
            Some(routine) => print!("{}", format_routine(today, &routine)),
            None => println!("no routine for {today} yet, run `coach generate`"),
        },
        Command::History => {
            print!("{}", format_history(&app.history().await?, today));
        }
        Command::Config { action } => match action {
            ConfigAction::Get { key: Some(key) } => {
                println!("{}", config.get(&key)?.unwrap_or_else(|| "(unset)".to_string()));
            }
            ConfigAction::Get { key: None } => {
                for key in keys::ALL {
                    let value = config.get(key)?.unwrap_or_else(|| "(unset)".to_string());
                    println!("{key:<18} {value}");
                }
            }
            ConfigAction::Set { key, value } => {
                config.set(&key, &value)?;
                println!("✓ {key} = {value}");
            }
            ConfigAction::Unset { key } => {
                config.remove(&key)?;
                println!("✓ {key} unset");
            }
        },
    }
    Ok(())
}

async fn repl(app: &App, db_path: &str, available_minutes: u32) -> anyhow::Result<()> {
    let trainer = app.trainer();
    let user = app.identity().current();
    print_banner(&BannerInfo {
        provider: trainer.provider(),
        model: trainer.model(),
        user: user.as_ref().map(UserId::as_str),
        db: db_path,
        today: RoutineDate::today(),
    });

    // Tracks whether the signed-in user has a profile, across /login and /logout.
    let (has_profile_tx, has_profile) = watch::channel(false);
    let mut profiles = Box::pin(app.follow_profile());
    let follower = tokio::spawn(async move {
        while let Some(item) = profiles.next().await {
            let present = match item {
                Ok(profile) => profile.is_some(),
                Err(e) => {
                    tracing::warn!("could not load profile: {e}");
                    false
                }
            };
            if has_profile_tx.send(present).is_err() {
                break;
            }
        }
    });

    let registry = CommandRegistry::new();
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        let prompt = match app.identity().current() {
            Some(user) if *has_profile.borrow() => format!("{user}"),
            Some(user) => format!("{user} (no profile)"),
            None => "coach".to_string(),
        };
        print!("\n{prompt}> ");
        io::stdout().flush()?;

        // Read next line, interruptible by Ctrl+C
        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {e}");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let info = SessionInfo {
            app,
            today: RoutineDate::today(),
            available_minutes,
            db_path,
        };

        // Ctrl+C during a command cancels the command, not the REPL
        let result = tokio::select! {
            result = registry.dispatch(input, &info) => result,
            _ = tokio::signal::ctrl_c() => {
                println!("\n\ninterrupted");
                CommandResult::Handled
            }
        };
        match result {
            CommandResult::Quit => break,
            CommandResult::Handled => {}
            CommandResult::NotACommand => println!("type /help for available commands"),
        }
    }

    follower.abort();
    print_session_summary(app.usage());
    Ok(())
}

fn build_trainer(
    provider: Provider,
    model: Option<String>,
    credentials: &CredentialStore,
) -> anyhow::Result<Arc<dyn Trainer>> {
    let api_key = credentials.api_key(provider.name(), provider.api_key_env())?;
    let trainer: Arc<dyn Trainer> = match provider {
        Provider::Anthropic => Arc::new(AnthropicTrainer::new(model, api_key)),
        Provider::Gemini => Arc::new(GeminiTrainer::new(model, api_key)),
    };
    Ok(trainer)
}

/// The `--db` path, or `~/.coach/coach.db` with its directory created.
fn resolve_db_path(flag: Option<&str>) -> anyhow::Result<String> {
    if let Some(path) = flag {
        return Ok(path.to_string());
    }
    let path = default_db_path().context("could not determine home directory")?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    Ok(path.to_string_lossy().into_owned())
}
