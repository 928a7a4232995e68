//! Upgrade path and version-aware attribute naming.

use crate::errors::{CheckError, ExError, ExErrorKind, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A managed-system release identifier, e.g. `6.15`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SatVersion(String);

impl SatVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SatVersion {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The "from" and "to" release of an upgrade, positioned in the ordered
/// list of supported releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradePath {
    pub supported_versions: Vec<SatVersion>,
    pub from_version: SatVersion,
    pub to_version: SatVersion,
}

impl UpgradePath {
    /// Build and validate an upgrade path
    ///
    /// # Errors
    ///
    /// See [`UpgradePath::validate`].
    pub fn new(
        supported_versions: Vec<SatVersion>,
        from_version: impl Into<SatVersion>,
        to_version: impl Into<SatVersion>,
    ) -> Result<Self> {
        let path = Self {
            supported_versions,
            from_version: from_version.into(),
            to_version: to_version.into(),
        };
        path.validate()?;
        Ok(path)
    }

    /// Check that both ends are supported and distinct
    ///
    /// # Errors
    ///
    /// `InvalidConfig` describing the first violated rule.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| {
            Err(ExError::new(ExErrorKind::InvalidConfig)
                .with_op("validate_upgrade_path")
                .with_message(msg))
        };
        if self.supported_versions.is_empty() {
            return invalid("supported_versions must not be empty".to_string());
        }
        for (end, version) in [("from", &self.from_version), ("to", &self.to_version)] {
            if !self.supported_versions.contains(version) {
                return invalid(format!(
                    "{}_version {} is not one of the supported versions {:?}",
                    end,
                    version,
                    self.supported_names()
                ));
            }
        }
        if self.from_version == self.to_version {
            return invalid(format!(
                "from_version and to_version are both {}",
                self.from_version
            ));
        }
        Ok(())
    }

    /// Version a snapshot side was captured on
    pub fn version_for(&self, before: bool) -> &SatVersion {
        if before {
            &self.from_version
        } else {
            &self.to_version
        }
    }

    fn supported_names(&self) -> Vec<&str> {
        self.supported_versions.iter().map(|v| v.as_str()).collect()
    }
}

/// Name of the attribute to compare, possibly renamed between releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeSpec {
    /// Same attribute name on both sides
    Same(String),
    /// Attribute name per release
    PerVersion(BTreeMap<SatVersion, String>),
}

/// Attribute names to look up on each side of the upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttribute {
    pub before: String,
    pub after: String,
}

impl AttributeSpec {
    pub fn same(name: impl Into<String>) -> Self {
        AttributeSpec::Same(name.into())
    }

    pub fn per_version<V, N>(names: impl IntoIterator<Item = (V, N)>) -> Self
    where
        V: Into<SatVersion>,
        N: Into<String>,
    {
        AttributeSpec::PerVersion(
            names
                .into_iter()
                .map(|(v, n)| (v.into(), n.into()))
                .collect(),
        )
    }

    /// Build from names ordered like `path.supported_versions`
    ///
    /// `["id", "uuid"]` against supported `[6.1, 6.2]` names `id` for 6.1
    /// and `uuid` for 6.2.
    ///
    /// # Errors
    ///
    /// `InvalidAttributeSpec` when empty or longer than the supported list.
    pub fn from_positional(names: &[String], path: &UpgradePath) -> Result<Self> {
        if names.is_empty() || names.len() > path.supported_versions.len() {
            return Err(CheckError::InvalidAttributeSpec {
                reason: format!(
                    "expected 1..={} positional names, got {}",
                    path.supported_versions.len(),
                    names.len()
                ),
            }
            .into());
        }
        Ok(AttributeSpec::PerVersion(
            path.supported_versions
                .iter()
                .cloned()
                .zip(names.iter().cloned())
                .collect(),
        ))
    }

    /// Build from an untyped JSON argument: a string or an array of strings
    ///
    /// # Errors
    ///
    /// `InvalidAttributeSpec` for any other shape.
    pub fn from_json(value: &Value, path: &UpgradePath) -> Result<Self> {
        match value {
            Value::String(name) => Ok(AttributeSpec::same(name.clone())),
            Value::Array(items) => {
                let names = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| CheckError::InvalidAttributeSpec {
                        reason: "array items must all be strings".to_string(),
                    })?;
                Self::from_positional(&names, path)
            }
            other => Err(CheckError::InvalidAttributeSpec {
                reason: format!(
                    "Please provide one of string/tuple, got {}",
                    json_type_name(other)
                ),
            }
            .into()),
        }
    }

    /// Resolve the names used on the before and after sides
    ///
    /// # Errors
    ///
    /// `InvalidAttributeSpec` if a per-version spec does not name both ends
    /// of the upgrade path.
    pub fn resolve(&self, path: &UpgradePath) -> Result<ResolvedAttribute> {
        match self {
            AttributeSpec::Same(name) => Ok(ResolvedAttribute {
                before: name.clone(),
                after: name.clone(),
            }),
            AttributeSpec::PerVersion(names) => {
                let lookup = |version: &SatVersion| {
                    names.get(version).cloned().ok_or_else(|| {
                        ExError::from(CheckError::InvalidAttributeSpec {
                            reason: format!("no attribute name given for version {}", version),
                        })
                    })
                };
                Ok(ResolvedAttribute {
                    before: lookup(&path.from_version)?,
                    after: lookup(&path.to_version)?,
                })
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
