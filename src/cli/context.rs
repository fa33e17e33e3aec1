//! Command execution context
//!
//! Loads config, opens the session store and restores the session manager,
//! so each command starts from the same state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::terminal::TerminalHost;
use crate::config::Config;
use crate::error::Result;
use crate::session::{SessionManager, SystemClock};
use crate::storage::SqliteStore;

/// Context for command execution containing config, session and runtime options.
pub struct CommandContext {
    /// Loaded configuration with CLI overrides applied
    pub config: Config,
    /// Restored session manager
    pub session: SessionManager,
    /// Location of the session database
    pub store_path: PathBuf,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a context with a fresh terminal host
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        Self::with_host(opts, Arc::new(TerminalHost::new()))
    }

    /// Create a context around a specific host.
    ///
    /// Store path precedence: `--store` > config `store_path` > data dir default.
    pub fn with_host(opts: &GlobalOptions, host: Arc<TerminalHost>) -> Result<Self> {
        let mut config = Config::load_at(opts.config_ref())?;

        if let Some(lang) = opts.lang {
            config.language = lang;
        }

        let store = match opts.store_ref() {
            Some(path) => SqliteStore::open_at(&PathBuf::from(path))?,
            None => match config.store_path.as_deref() {
                Some(path) => SqliteStore::open_at(path)?,
                None => SqliteStore::open()?,
            },
        };
        let store_path = store.path().to_path_buf();

        let session = SessionManager::new(
            Arc::new(store),
            Arc::new(SystemClock),
            host,
            config.session_settings(),
        );
        session.restore();

        Ok(Self {
            config,
            session,
            store_path,
            format: opts.format,
        })
    }
}
