use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qibla_cli::commands::{align, direction, next, schedule, venues};
use qibla_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();
    match command {
        Commands::Direction { location, json } => {
            direction::run(&mut stdout, location, *json, &config)?;
        }
        Commands::Next(args) => next::run(&mut stdout, args, &config)?,
        Commands::Schedule(args) => schedule::run(&mut stdout, args, &config)?,
        Commands::Align(args) => {
            let stdin = io::stdin().lock();
            let mut stderr = io::stderr().lock();
            align::run(stdin, &mut stdout, &mut stderr, args, &config)?;
        }
        Commands::Venues { json } => venues::run(&mut stdout, *json, &config)?,
    }

    Ok(())
}
