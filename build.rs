// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: PKG-INFO file
fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_name("FILE")
        .help("Path to the PKG-INFO file")
}

/// Common arguments: marker variable overrides
fn marker_args() -> [Arg; 2] {
    [
        Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("TOML file with marker variable overrides"),
        Arg::new("var")
            .long("var")
            .value_name("NAME=VALUE")
            .action(ArgAction::Append)
            .help("Override a marker variable (repeatable)"),
    ]
}

fn build_cli() -> Command {
    Command::new("pkgmeta")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read, check and rewrite PKG-INFO metadata files")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (overridden by RUST_LOG)"),
        )
        .subcommand(
            Command::new("show")
                .about("Print the fields of a PKG-INFO file")
                .arg(file_arg())
                .arg(
                    Arg::new("field")
                        .short('f')
                        .long("field")
                        .value_name("NAME")
                        .action(ArgAction::Append)
                        .help("Only print these fields (repeatable)"),
                )
                .arg(
                    Arg::new("platform_dependent")
                        .short('p')
                        .long("platform-dependent")
                        .action(ArgAction::SetTrue)
                        .help("Evaluate environment markers and hide values that do not apply"),
                )
                .args(marker_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print a JSON object instead of headers"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report missing required fields and invalid values")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("eval")
                .about("Evaluate an environment marker expression")
                .arg(Arg::new("marker").required(true).help("Marker expression"))
                .args(marker_args()),
        )
        .subcommand(
            Command::new("normalize")
                .about("Read a PKG-INFO file and write it back in canonical form")
                .arg(file_arg())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output path (stdout if omitted)"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pkgmeta.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
