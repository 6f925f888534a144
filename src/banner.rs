//! Startup banner and session summary display.

use crate::consts::{AUTHOR, HOMEPAGE, REPO, format_number};
use crate::domain::RoutineDate;
use crate::trainer::TokenUsage;

/// Session details shown when the REPL starts.
pub struct BannerInfo<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    /// Signed-in user id, or `None`.
    pub user: Option<&'a str>,
    pub db: &'a str,
    pub today: RoutineDate,
}

pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║              C O A C H                ║
   ║        one routine a day, kept        ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   trainer   {} ({})
   user      {}
   db        {}
   today     {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.provider,
        info.model,
        info.user.unwrap_or("not logged in (/login <id>)"),
        info.db,
        info.today,
    );
}

/// Print the session summary (token usage + farewell).
pub fn print_session_summary(usage: TokenUsage) {
    if usage.total() > 0 {
        println!(
            "session: {:>6} input + {:>6} output = {:>6} tokens",
            format_number(usage.input_tokens),
            format_number(usage.output_tokens),
            format_number(usage.total()),
        );
    }
    println!("keep moving.");
}
