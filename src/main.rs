//! EatIT CLI - session companion for the EatIT client

use clap::Parser;

use eatit::cli::args::GlobalOptions;
use eatit::cli::{self, Cli, Commands};
use eatit::error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Login(args) => cli::login::run(&opts, &args),
        Commands::Logout => cli::logout::run(&opts),
        Commands::Status => cli::status::run(&opts),
        Commands::Watch { sync_interval } => cli::watch::run(&opts, sync_interval).await,
        Commands::Version => {
            println!("eatit version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; otherwise warn, or debug with `--debug`
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
