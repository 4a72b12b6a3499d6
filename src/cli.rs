// src/cli.rs
//! CLI definitions for pkgmeta
//!
//! Command implementations live in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pkgmeta")]
#[command(version)]
#[command(about = "Read, check and rewrite PKG-INFO metadata files", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Marker evaluation options shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct MarkerArgs {
    /// TOML file with marker variable overrides
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override a marker variable (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the fields of a PKG-INFO file
    Show {
        /// Path to the PKG-INFO file
        file: PathBuf,

        /// Only print these fields (repeatable)
        #[arg(short, long = "field", value_name = "NAME")]
        fields: Vec<String>,

        /// Evaluate environment markers and hide values that do not apply
        #[arg(short, long)]
        platform_dependent: bool,

        #[command(flatten)]
        markers: MarkerArgs,

        /// Print a JSON object instead of headers
        #[arg(long)]
        json: bool,
    },

    /// Report missing required fields and invalid values
    Check {
        /// Path to the PKG-INFO file
        file: PathBuf,
    },

    /// Evaluate an environment marker expression
    Eval {
        /// Marker expression, e.g. "sys.platform == 'linux'"
        marker: String,

        #[command(flatten)]
        markers: MarkerArgs,
    },

    /// Read a PKG-INFO file and write it back in canonical form
    Normalize {
        /// Path to the PKG-INFO file
        file: PathBuf,

        /// Output path (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Parse `NAME=VALUE`
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}
