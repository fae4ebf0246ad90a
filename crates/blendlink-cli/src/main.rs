//! BlendLink CLI - diagnostics for the blendshape UDP pipe.
//!
//! `listen` watches the stream the desktop app consumes; `send` puts
//! synthetic frames on the wire to verify the pipe end to end.

mod cli;
mod commands;
mod error;

use clap::Parser;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Listen(args) => commands::run_listen(args, cli.ndjson).await,
        Commands::Send(args) => commands::run_send(args, cli.ndjson).await,
    }
}
