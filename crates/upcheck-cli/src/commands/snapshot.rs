//! Snapshot import and inspection commands

use crate::commands::{read_input, snapshot_store};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use upcheck_core::normalize::normalize;
use upcheck_core::{EndpointMode, Snapshot, SnapshotLabel};
use upcheck_store::SnapshotStore;

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

#[derive(Debug, Subcommand)]
pub enum SnapshotCommand {
    /// Persist a collected snapshot document
    Import(ImportArgs),
    /// Print a persisted snapshot as JSON
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// preupgrade or postupgrade
    #[arg(long)]
    pub label: String,

    /// cli or api
    #[arg(long)]
    pub endpoint: String,

    /// JSON document: a list of single-key maps of component type to entities
    #[arg(long)]
    pub file: PathBuf,

    /// Persist the document as collected, without endpoint normalization
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub label: String,

    #[arg(long)]
    pub endpoint: String,
}

pub fn execute(args: SnapshotArgs, store_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SnapshotCommand::Import(import_args) => execute_import(import_args, store_root),
        SnapshotCommand::Show(show_args) => execute_show(show_args, store_root),
    }
}

fn execute_import(args: ImportArgs, store_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let label: SnapshotLabel = args.label.parse()?;
    let endpoint: EndpointMode = args.endpoint.parse()?;

    let snapshot: Snapshot = serde_json::from_str(&read_input(&args.file)?)?;
    let snapshot = if args.raw {
        snapshot
    } else {
        normalize(snapshot, endpoint)?
    };

    let digest = snapshot_store(store_root).put(label, endpoint, &snapshot)?;

    println!("Snapshot imported:");
    println!("  label: {}", label);
    println!("  endpoint: {}", endpoint);
    println!("  components: {}", snapshot.records().len());
    println!("  digest: {}", digest);
    Ok(())
}

fn execute_show(args: ShowArgs, store_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = snapshot_store(store_root).get_named(&args.label, &args.endpoint)?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
