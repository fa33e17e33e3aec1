//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};
use crate::i18n::Language;

/// Global CLI options passed to all command handlers.
///
/// Precedence is CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; the config file is merged in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.eatit/config.yaml)
    pub config: Option<String>,

    /// Custom session database path
    pub store: Option<String>,

    /// Notice language override
    pub lang: Option<Language>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            store: cli.store.clone(),
            lang: cli.lang,
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Get store path as `Option<&str>`.
    pub fn store_ref(&self) -> Option<&str> {
        self.store.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_accessors() {
        let opts = GlobalOptions {
            format: OutputFormat::Json,
            config: Some("/custom/config.yaml".to_string()),
            store: Some("/custom/session.db".to_string()),
            lang: Some(Language::Vi),
        };

        assert_eq!(opts.config_ref(), Some("/custom/config.yaml"));
        assert_eq!(opts.store_ref(), Some("/custom/session.db"));
        assert_eq!(opts.lang, Some(Language::Vi));
    }

    #[test]
    fn test_global_options_none_accessors() {
        let opts = GlobalOptions {
            format: OutputFormat::Pretty,
            config: None,
            store: None,
            lang: None,
        };

        assert_eq!(opts.config_ref(), None);
        assert_eq!(opts.store_ref(), None);
        assert_eq!(opts.lang, None);
    }

    #[test]
    fn test_from_cli() {
        use clap::Parser;

        let cli = Cli::parse_from([
            "eatit",
            "--format",
            "json",
            "--store",
            "/tmp/s.db",
            "--lang",
            "vi",
            "status",
        ]);
        let opts = GlobalOptions::from_cli(&cli);

        assert_eq!(opts.format, OutputFormat::Json);
        assert_eq!(opts.store_ref(), Some("/tmp/s.db"));
        assert_eq!(opts.lang, Some(Language::Vi));
    }
}
