//! Closed vocabularies used as persistence keys.
//!
//! Every vocabulary parses by exact, case-sensitive match with no trimming,
//! since the parsed value becomes part of a storage path.

use crate::errors::CheckError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state a snapshot or template was captured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SnapshotLabel {
    #[serde(rename = "preupgrade", alias = "before")]
    PreUpgrade,
    #[serde(rename = "postupgrade", alias = "after")]
    PostUpgrade,
}

impl SnapshotLabel {
    pub const ALL: [SnapshotLabel; 2] = [SnapshotLabel::PreUpgrade, SnapshotLabel::PostUpgrade];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotLabel::PreUpgrade => "preupgrade",
            SnapshotLabel::PostUpgrade => "postupgrade",
        }
    }
}

impl fmt::Display for SnapshotLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotLabel {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preupgrade" | "before" => Ok(SnapshotLabel::PreUpgrade),
            "postupgrade" | "after" => Ok(SnapshotLabel::PostUpgrade),
            _ => Err(CheckError::InvalidLabel {
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|l| l.as_str().to_string()).collect(),
            }),
        }
    }
}

/// Collection endpoint a snapshot was read through.
///
/// Snapshots from different endpoints are never compared with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointMode {
    /// Command-line tool output; attribute names and values lower-cased
    Cli,
    /// Remote API records; nested values kept as collected
    Api,
}

impl EndpointMode {
    pub const ALL: [EndpointMode; 2] = [EndpointMode::Cli, EndpointMode::Api];

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointMode::Cli => "cli",
            EndpointMode::Api => "api",
        }
    }
}

impl fmt::Display for EndpointMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointMode {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cli" => Ok(EndpointMode::Cli),
            "api" => Ok(EndpointMode::Api),
            _ => Err(CheckError::InvalidEndpoint {
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            }),
        }
    }
}

/// Kind of rendered template artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    JobTemplate,
    Template,
    PartitionTable,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::JobTemplate,
        TemplateKind::Template,
        TemplateKind::PartitionTable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::JobTemplate => "job-template",
            TemplateKind::Template => "template",
            TemplateKind::PartitionTable => "partition-table",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CheckError::InvalidTemplateKind {
                value: s.to_string(),
                allowed: Self::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_parse() {
        assert_eq!("cli".parse::<EndpointMode>().unwrap(), EndpointMode::Cli);
        assert_eq!("api".parse::<EndpointMode>().unwrap(), EndpointMode::Api);
    }

    #[test]
    fn test_endpoint_rejects_unknown_and_lists_allowed() {
        let err = "rest".parse::<EndpointMode>().unwrap_err();
        assert_eq!(
            err,
            CheckError::InvalidEndpoint {
                value: "rest".to_string(),
                allowed: vec!["cli".to_string(), "api".to_string()],
            }
        );
    }

    #[test]
    fn test_template_kind_round_trips_through_str() {
        for kind in TemplateKind::ALL {
            assert_eq!(kind.as_str().parse::<TemplateKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_template_kind_rejects_unknown() {
        let err = "provisioning".parse::<TemplateKind>().unwrap_err();
        assert!(matches!(err, CheckError::InvalidTemplateKind { .. }));
    }

    #[test]
    fn test_label_accepts_before_after_aliases() {
        assert_eq!(
            "before".parse::<SnapshotLabel>().unwrap(),
            SnapshotLabel::PreUpgrade
        );
        assert_eq!(
            "postupgrade".parse::<SnapshotLabel>().unwrap(),
            SnapshotLabel::PostUpgrade
        );
        assert!("during".parse::<SnapshotLabel>().is_err());
    }

    #[test]
    fn test_template_kind_serde_is_kebab_case() {
        let json = serde_json::to_string(&TemplateKind::PartitionTable).unwrap();
        assert_eq!(json, "\"partition-table\"");
    }

    #[test]
    fn test_vocabularies_parse_exactly() {
        for input in ["PreUpgrade", " preupgrade", "before\n", "AFTER"] {
            assert!(input.parse::<SnapshotLabel>().is_err(), "{:?}", input);
        }
        for input in ["CLI", " api", "api "] {
            assert!(input.parse::<EndpointMode>().is_err(), "{:?}", input);
        }
        for input in ["Template", " job-template", "partition_table"] {
            assert!(input.parse::<TemplateKind>().is_err(), "{:?}", input);
        }
    }
}
