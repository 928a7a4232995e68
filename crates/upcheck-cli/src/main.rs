//! upcheck CLI
//!
//! Command-line interface for upgrade validation

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use upcheck_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "upcheck")]
#[command(about = "upcheck - Offline pre/post-upgrade validation", long_about = None)]
struct Cli {
    /// Directory holding persisted snapshots and templates
    #[arg(long, global = true, default_value = ".upcheck")]
    store: PathBuf,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Snapshot persistence operations
    Snapshot(commands::snapshot::SnapshotArgs),
    /// Template persistence operations
    Template(commands::template::TemplateArgs),
    /// Compare entities or templates across the upgrade
    Compare(commands::compare::CompareArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Snapshot(args) => commands::snapshot::execute(args, &cli.store).map(|()| true),
        Commands::Template(args) => commands::template::execute(args, &cli.store).map(|()| true),
        Commands::Compare(args) => commands::compare::execute(args, &cli.store),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
