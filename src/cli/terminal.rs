//! Terminal implementation of the session host

use std::sync::Mutex;

use colored::Colorize;
use indicatif::ProgressBar;

use crate::session::SessionHost;

/// Prints notices to stderr and points the user back at `eatit login`.
///
/// While `watch` shows a spinner, output goes through the spinner so lines
/// don't tear.
#[derive(Default)]
pub struct TerminalHost {
    progress: Mutex<Option<ProgressBar>>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route output through a spinner until [`detach_progress`](Self::detach_progress)
    pub fn attach_progress(&self, bar: ProgressBar) {
        if let Ok(mut slot) = self.progress.lock() {
            *slot = Some(bar);
        }
    }

    pub fn detach_progress(&self) {
        if let Ok(mut slot) = self.progress.lock() {
            *slot = None;
        }
    }

    fn emit(&self, line: String) {
        let bar = self.progress.lock().ok().and_then(|slot| slot.clone());
        match bar {
            Some(bar) => bar.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }
}

impl SessionHost for TerminalHost {
    fn show_notice(&self, message: &str) {
        self.emit(format!("{} {}", "⚠".yellow(), message.yellow()));
    }

    fn redirect_to_login(&self, login_url: &str) {
        self.emit(format!(
            "  → Run {} to sign in again ({})",
            "eatit login".cyan(),
            login_url.dimmed()
        ));
    }
}
