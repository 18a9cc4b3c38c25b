//! dbmigrate CLI - versioned SQL schema migrations

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{down, init, new, reset, status, up, update, version};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over the verbosity default
    let default_filter = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match &cli.command {
        cli::Commands::Init(args) => init::execute(args),
        cli::Commands::New(args) => new::execute(args, &cli.global),
        cli::Commands::Reset(args) => reset::execute(args, &cli.global),
        cli::Commands::Up(args) => up::execute(args, &cli.global),
        cli::Commands::Down(args) => down::execute(args, &cli.global),
        cli::Commands::Update(args) => update::execute(args, &cli.global),
        cli::Commands::Version => version::execute(&cli.global),
        cli::Commands::Status => status::execute(&cli.global),
    }
}
