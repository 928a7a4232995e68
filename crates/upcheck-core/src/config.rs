//! Comparison configuration injected into the correlator and diff engine.

use crate::errors::{CheckError, Result};
use crate::model::{EndpointMode, TemplateKind, UpgradePath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute that identifies "the same" entity across snapshots, per component.
///
/// Only consulted for CLI-collected snapshots; API records always correlate
/// by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyAttributeTable {
    keys: BTreeMap<String, String>,
}

/// Key attribute used for every API-collected component
pub const API_KEY_ATTRIBUTE: &str = "id";

impl KeyAttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, component: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.keys
            .insert(component.into().to_lowercase(), attribute.into().to_lowercase());
        self
    }

    /// Key attribute for `component` under `endpoint`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when a CLI component has no declared key attribute.
    pub fn key_for(&self, endpoint: EndpointMode, component: &str) -> Result<String> {
        match endpoint {
            EndpointMode::Api => Ok(API_KEY_ATTRIBUTE.to_string()),
            EndpointMode::Cli => self
                .keys
                .get(&component.to_lowercase())
                .cloned()
                .ok_or_else(|| {
                    CheckError::NoKeyAttribute {
                        component: component.to_string(),
                    }
                    .into()
                }),
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}

/// Approved diff snippets per template kind.
///
/// A changed diff line that is a substring of any snippet for its kind is an
/// expected variant introduced by the upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantRules {
    rules: BTreeMap<TemplateKind, Vec<String>>,
}

impl VariantRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, kind: TemplateKind, snippet: impl Into<String>) -> Self {
        self.rules.entry(kind).or_default().push(snippet.into());
        self
    }

    pub fn rules_for(&self, kind: TemplateKind) -> &[String] {
        self.rules.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Full configuration of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    pub endpoint: EndpointMode,
    pub upgrade: UpgradePath,
    #[serde(default)]
    pub key_attributes: KeyAttributeTable,
    #[serde(default)]
    pub variant_rules: VariantRules,
}

impl CheckConfig {
    pub fn new(endpoint: EndpointMode, upgrade: UpgradePath) -> Self {
        Self {
            endpoint,
            upgrade,
            key_attributes: KeyAttributeTable::new(),
            variant_rules: VariantRules::new(),
        }
    }

    /// # Errors
    ///
    /// `InvalidConfig` if the upgrade path is inconsistent.
    pub fn validate(&self) -> Result<()> {
        self.upgrade.validate()
    }
}
