//! Comparison commands
//!
//! Exit status is 0 when everything matches, 2 when any entity mismatches or
//! template diff is rejected.

use crate::commands::{snapshot_store, template_store};
use clap::{Args, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use upcheck_core::{AttributeSpec, CheckConfig, SatVersion, TemplateKind};
use upcheck_engine::commands::{apply_engine_command, EngineCommand, EngineCommandResult};
use upcheck_store::config::load_config;

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// YAML run configuration
    #[arg(long, global = true, default_value = "upcheck.yaml")]
    pub config: PathBuf,

    /// Override the configured endpoint (cli or api)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Override the configured source version
    #[arg(long, global = true)]
    pub from_version: Option<String>,

    /// Override the configured target version
    #[arg(long, global = true)]
    pub to_version: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: CompareCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum CompareCommand {
    /// Correlate one attribute of a component type
    Entities(EntitiesArgs),
    /// Diff every stored template of a kind
    Templates(TemplatesArgs),
}

#[derive(Debug, Args)]
pub struct EntitiesArgs {
    #[arg(long)]
    pub component: String,

    /// Attribute name, used for every version unless renamed
    #[arg(long)]
    pub attribute: String,

    /// Attribute name on a specific version, as VERSION=NAME
    #[arg(long, value_parser = parse_rename)]
    pub renamed: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// job-template, template or partition-table
    #[arg(long)]
    pub kind: String,
}

fn parse_rename(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((version, name)) if !version.trim().is_empty() && !name.trim().is_empty() => {
            Ok((version.trim().to_string(), name.trim().to_string()))
        }
        _ => Err(format!("expected VERSION=NAME, got '{}'", raw)),
    }
}

fn effective_config(args: &CompareArgs) -> Result<CheckConfig, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.parse()?;
    }
    if let Some(version) = &args.from_version {
        config.upgrade.from_version = SatVersion::from(version.as_str());
    }
    if let Some(version) = &args.to_version {
        config.upgrade.to_version = SatVersion::from(version.as_str());
    }
    config.validate()?;
    Ok(config)
}

fn attribute_spec(args: &EntitiesArgs, config: &CheckConfig) -> AttributeSpec {
    if args.renamed.is_empty() {
        return AttributeSpec::same(args.attribute.as_str());
    }
    let mut names: Vec<(SatVersion, String)> = config
        .upgrade
        .supported_versions
        .iter()
        .map(|v| (v.clone(), args.attribute.clone()))
        .collect();
    for (version, name) in &args.renamed {
        names.push((SatVersion::from(version.as_str()), name.clone()));
    }
    // Later entries win, so renames override the default name
    AttributeSpec::per_version(names)
}

pub fn execute(args: CompareArgs, store_root: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let config = effective_config(&args)?;

    let cmd = match &args.command {
        CompareCommand::Entities(entities) => EngineCommand::CompareEntities {
            component: entities.component.clone(),
            attribute: attribute_spec(entities, &config),
        },
        CompareCommand::Templates(templates) => EngineCommand::CompareTemplates {
            kind: templates.kind.parse::<TemplateKind>()?,
        },
    };

    let result = apply_engine_command(
        cmd,
        &config,
        &snapshot_store(store_root),
        &template_store(store_root),
    )?;

    match args.format {
        OutputFormat::Markdown => print!("{}", result.render_report()),
        OutputFormat::Json => {
            let json = match &result {
                EngineCommandResult::Entities(c) => serde_json::to_string_pretty(c)?,
                EngineCommandResult::Templates(r) => serde_json::to_string_pretty(r)?,
            };
            println!("{}", json);
        }
    }

    let passed = result.passed();
    if !passed {
        tracing::warn!("comparison found differences");
    }
    Ok(passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use upcheck_core::{EndpointMode, UpgradePath};

    #[test]
    fn test_parse_rename() {
        assert_eq!(
            parse_rename("6.3=operating system").unwrap(),
            ("6.3".to_string(), "operating system".to_string())
        );
        assert!(parse_rename("6.3").is_err());
        assert!(parse_rename("=os").is_err());
    }

    #[test]
    fn test_attribute_spec_renames_override_default() {
        let upgrade = UpgradePath::new(vec!["6.2".into(), "6.3".into()], "6.2", "6.3").unwrap();
        let config = CheckConfig::new(EndpointMode::Cli, upgrade.clone());
        let args = EntitiesArgs {
            component: "host".to_string(),
            attribute: "os".to_string(),
            renamed: vec![("6.3".to_string(), "operatingsystem".to_string())],
        };

        let resolved = attribute_spec(&args, &config).resolve(&upgrade).unwrap();

        assert_eq!(resolved.before, "os");
        assert_eq!(resolved.after, "operatingsystem");
    }
}
