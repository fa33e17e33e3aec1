//! Logout command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::Result;

/// End the stored session. Succeeds whether or not one exists.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let user = ctx.session.user();
    ctx.session.logout();

    match user {
        Some(user) => println!("{} Signed out {}", "✓".green(), user.user_name.bold()),
        None => println!("{} No active session", "○".dimmed()),
    }

    Ok(())
}
