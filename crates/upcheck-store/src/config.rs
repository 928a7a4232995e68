//! Configuration loader with validation
//!
//! Parses a YAML [`CheckConfig`] and validates the upgrade path and rules

use crate::errors::{config_invalid, Result};
use std::fs;
use std::path::Path;
use upcheck_core::{CheckConfig, TemplateKind};

/// Load a configuration file from a path
///
/// # Errors
///
/// `InvalidConfig` if the file cannot be read, parsed or validated.
pub fn load_config(path: &Path) -> Result<CheckConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        config_invalid(&format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config_str(&content)
}

/// Parse a configuration from a string
///
/// # Errors
///
/// `InvalidConfig` on YAML errors or failed validation.
pub fn parse_config_str(content: &str) -> Result<CheckConfig> {
    let config: CheckConfig = serde_yaml::from_str(content)
        .map_err(|e| config_invalid(&format!("YAML parse error: {}", e)))?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &CheckConfig) -> Result<()> {
    config.validate()?;

    for component in config.key_attributes.components() {
        if component.trim().is_empty() {
            return Err(config_invalid("Key attribute table has an empty component name"));
        }
    }

    for kind in TemplateKind::ALL {
        if config
            .variant_rules
            .rules_for(kind)
            .iter()
            .any(|rule| rule.trim().is_empty())
        {
            return Err(config_invalid(&format!(
                "Empty variant rule for {} templates",
                kind
            )));
        }
    }

    Ok(())
}
