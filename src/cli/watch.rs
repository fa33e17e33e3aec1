//! Watch command implementation
//!
//! Keeps one session manager alive with its expiry timers running, so the
//! forced-logout path can be observed from a terminal.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use tokio::time;

use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::cli::terminal::TerminalHost;
use crate::error::Result;
use crate::models::format_remaining;
use crate::session::SessionManager;

/// How watching stopped
enum Outcome {
    SessionEnded,
    Interrupted,
}

fn describe(session: &SessionManager) -> String {
    let name = session
        .user()
        .map(|u| u.user_name)
        .unwrap_or_else(|| "-".to_string());
    match session.time_remaining() {
        Some(remaining) => format!(
            "{} signed in, token expires in {}",
            name,
            format_remaining(remaining)
        ),
        None => format!("{} signed in", name),
    }
}

/// Run the watch command until the session ends or Ctrl-C
pub async fn run(opts: &GlobalOptions, sync_interval: u64) -> Result<()> {
    let host = Arc::new(TerminalHost::new());
    let ctx = CommandContext::with_host(opts, host.clone())?;

    if !ctx.session.is_authenticated() {
        println!("{} No active session", "○".dimmed());
        println!("  → Run 'eatit login' first");
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(describe(&ctx.session));
    spinner.enable_steady_tick(Duration::from_millis(120));
    host.attach_progress(spinner.clone());

    let mut updates = ctx.session.subscribe();
    let mut sync = time::interval(Duration::from_secs(sync_interval.max(1)));
    let mut refresh = time::interval(Duration::from_secs(1));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            _ = &mut ctrl_c => break Outcome::Interrupted,
            changed = updates.changed() => {
                if changed.is_err() || !updates.borrow_and_update().is_authenticated() {
                    break Outcome::SessionEnded;
                }
            }
            _ = sync.tick() => ctx.session.sync_from_store(),
            _ = refresh.tick() => spinner.set_message(describe(&ctx.session)),
        }
    };

    spinner.finish_and_clear();
    host.detach_progress();

    match outcome {
        Outcome::SessionEnded => {
            info!("Watched session ended");
            println!("{} Session ended", "○".dimmed());
        }
        Outcome::Interrupted => {
            println!("{} Stopped watching; {}", "○".dimmed(), describe(&ctx.session));
        }
    }

    Ok(())
}
