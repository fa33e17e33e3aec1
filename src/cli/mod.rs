//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod completions;
pub mod context;
pub mod login;
pub mod logout;
pub mod status;
pub mod terminal;
pub mod watch;

pub use args::OutputFormat;
pub use context::CommandContext;

use crate::i18n::Language;

/// EatIT - session companion for the EatIT client
#[derive(Parser, Debug)]
#[command(name = "eatit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "EATIT_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "EATIT_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override session database location
    #[arg(long, global = true, env = "EATIT_STORE", hide_env = true)]
    pub store: Option<String>,

    /// Language for notices (en, vi)
    #[arg(long, global = true, env = "EATIT_LANG", hide_env = true)]
    pub lang: Option<Language>,

    /// Enable debug logging
    #[arg(long, global = true, env = "EATIT_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store a session issued by the backend login endpoint
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Show the current session
    Status,

    /// Keep the session under watch until it expires or is ended
    Watch {
        /// Seconds between checks for logins/logouts by other processes
        #[arg(long, default_value_t = 5)]
        sync_interval: u64,
    },

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   eatit completion bash > /etc/bash_completion.d/eatit
  zsh:    eatit completion zsh > \"${fpath[1]}/_eatit\"
  fish:   eatit completion fish > ~/.config/fish/completions/eatit.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Token and identity returned by the backend login endpoint
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Bearer token (prompted for when omitted)
    #[arg(long, env = "EATIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Numeric user ID
    #[arg(long)]
    pub user_id: i64,

    /// Display name
    #[arg(long)]
    pub user_name: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Numeric role ID
    #[arg(long)]
    pub role_id: i64,

    /// Role name
    #[arg(long)]
    pub role_name: String,
}
