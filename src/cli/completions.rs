//! Shell completion generation

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Write completions for `shell` to stdout
pub fn run(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "eatit", &mut std::io::stdout());
}
