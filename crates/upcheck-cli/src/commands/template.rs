//! Template persistence commands

use crate::commands::{read_input, template_store};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use upcheck_core::{SnapshotLabel, TemplateKind};
use upcheck_store::TemplateStore;

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplateCommand {
    /// Store a rendered template body
    Put(PutArgs),
    /// List stored template ids
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct PutArgs {
    /// preupgrade or postupgrade
    #[arg(long)]
    pub state: String,

    /// job-template, template or partition-table
    #[arg(long)]
    pub kind: String,

    #[arg(long)]
    pub id: String,

    /// File holding the rendered body
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub kind: String,
}

pub fn execute(args: TemplateArgs, store_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        TemplateCommand::Put(put_args) => {
            let state: SnapshotLabel = put_args.state.parse()?;
            let kind: TemplateKind = put_args.kind.parse()?;
            let text = read_input(&put_args.file)?;
            template_store(store_root).put(state, kind, &put_args.id, &text)?;
            println!("Template stored: {}/{}/{}", state, kind, put_args.id.trim());
            Ok(())
        }
        TemplateCommand::List(list_args) => {
            let state: SnapshotLabel = list_args.state.parse()?;
            for id in template_store(store_root).list_ids_named(state, &list_args.kind)? {
                println!("{}", id);
            }
            Ok(())
        }
    }
}
