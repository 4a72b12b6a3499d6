// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show {
            file,
            fields,
            platform_dependent,
            markers,
            json,
        } => commands::cmd_show(&file, &fields, platform_dependent, &markers, json),
        Commands::Check { file } => commands::cmd_check(&file),
        Commands::Eval { marker, markers } => commands::cmd_eval(&marker, &markers),
        Commands::Normalize { file, output } => commands::cmd_normalize(&file, output.as_deref()),
    }
}
