//! Login command implementation

use colored::Colorize;
use dialoguer::{Password, theme::ColorfulTheme};

use crate::cli::LoginArgs;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::{Error, Result};
use crate::models::format_remaining;
use crate::session::User;

/// Store a session issued by the backend.
///
/// The token is checked once right after login, so a token that is already
/// inside its expiry buffer is dropped with the usual session-expired notice.
pub fn run(opts: &GlobalOptions, args: &LoginArgs) -> Result<()> {
    let token = match &args.token {
        Some(token) => token.clone(),
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Paste the access token")
            .interact()?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(Error::Other("Token must not be empty".to_string()));
    }

    let ctx = CommandContext::new(opts)?;

    ctx.session.login(
        token,
        User {
            user_id: args.user_id,
            user_name: args.user_name.clone(),
            email: args.email.clone(),
            role_id: args.role_id,
            role_name: args.role_name.clone(),
        },
    );

    if ctx.session.check_expiry() {
        return Err(Error::Other(
            "Session rejected: token is expired or unreadable".to_string(),
        ));
    }

    println!("{} Signed in as {}", "✓".green(), args.user_name.bold());
    if let Some(remaining) = ctx.session.time_remaining() {
        println!("  Token expires in {}", format_remaining(remaining));
    }

    Ok(())
}
