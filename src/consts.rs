//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Name of the generation endpoint. Logged with every generation so the
/// call can be matched against the provider's request logs.
pub const GENERATE_ENDPOINT: &str = "generateExerciseRoutine";

/// How many past routine documents feed the generator's history.
pub const HISTORY_DOCUMENT_LIMIT: usize = 30;

/// Workout length used when none is configured.
pub const DEFAULT_AVAILABLE_MINUTES: u32 = 60;

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "COACH_LOG";

/// Default database path: `~/.coach/coach.db`.
/// Single DB for documents, identity, credentials, and config.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".coach").join("coach.db"))
}

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
