//! Status command implementation

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::Result;
use crate::models::{SessionDisplay, SessionRow};
use crate::output::{self, Formattable, json::format_json, table::format_table};

/// Session status plus where it came from
#[derive(Debug, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub session: SessionDisplay,
    pub store_path: PathBuf,
    pub login_url: String,
}

impl StatusReport {
    pub fn from_context(ctx: &CommandContext) -> Self {
        Self {
            session: SessionDisplay::from_state(&ctx.session.state(), chrono::Utc::now()),
            store_path: ctx.store_path.clone(),
            login_url: ctx.config.login_url.clone(),
        }
    }

    fn pretty(&self) -> String {
        let mut lines = vec![
            format!("{}\n", "EatIT Session Status".bold()),
            format!(
                "Session store: {}",
                self.store_path.display().to_string().cyan()
            ),
            String::new(),
        ];

        let s = &self.session;
        match &s.user_name {
            Some(name) => {
                lines.push(format!(
                    "{} Signed in as {} ({}, {})",
                    "✓".green(),
                    name.bold(),
                    s.email.as_deref().unwrap_or("-"),
                    s.role.as_deref().unwrap_or("-")
                ));
                match (&s.expires_at, &s.remaining) {
                    (Some(at), Some(remaining)) => lines.push(format!(
                        "{} Token valid until {} ({} left)",
                        "✓".green(),
                        at,
                        remaining
                    )),
                    _ => lines.push(format!("{} Token expiry unknown", "⚠".yellow())),
                }
            }
            None => {
                lines.push(format!("{} Not signed in", "✗".red()));
                lines.push(format!("  → Run 'eatit login' ({})", self.login_url));
            }
        }

        lines.join("\n")
    }
}

impl Formattable for StatusReport {
    fn format(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Pretty => self.pretty(),
            OutputFormat::Table => format_table(&[SessionRow::from(&self.session)]),
            OutputFormat::Json => format_json(self)?,
        })
    }
}

/// Run the status command
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    output::print(&StatusReport::from_context(&ctx), ctx.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    fn anonymous_report() -> StatusReport {
        StatusReport {
            session: SessionDisplay::from_state(&SessionState::Anonymous, chrono::Utc::now()),
            store_path: PathBuf::from("/tmp/session.db"),
            login_url: "/login".to_string(),
        }
    }

    #[test]
    fn test_pretty_anonymous() {
        let out = anonymous_report().format(OutputFormat::Pretty).unwrap();

        assert!(out.contains("Not signed in"));
        assert!(out.contains("/tmp/session.db"));
        assert!(out.contains("eatit login"));
    }

    #[test]
    fn test_json_is_flat() {
        let out = anonymous_report().format(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["data"]["state"], "anonymous");
        assert_eq!(value["data"]["store_path"], "/tmp/session.db");
        assert!(value["data"]["user_name"].is_null());
    }
}
