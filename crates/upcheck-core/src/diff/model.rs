//! Template comparison output types.

use crate::diff::lines::DiffLine;
use crate::model::{SatVersion, SnapshotLabel, TemplateKind};
use serde::Serialize;
use std::fmt;

/// Address of one stored template body.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TemplateRef {
    pub state: SnapshotLabel,
    pub kind: TemplateKind,
    pub id: String,
}

impl TemplateRef {
    /// Build a reference; `id` is trimmed of surrounding whitespace
    pub fn new(state: SnapshotLabel, kind: TemplateKind, id: &str) -> Self {
        Self {
            state,
            kind,
            id: id.trim().to_string(),
        }
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.state, self.kind, self.id)
    }
}

/// A template body as fetched from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateBody {
    Present { template: TemplateRef, text: String },
    Missing { template: TemplateRef },
}

impl TemplateBody {
    pub fn template(&self) -> &TemplateRef {
        match self {
            TemplateBody::Present { template, .. } | TemplateBody::Missing { template } => {
                template
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            TemplateBody::Present { text, .. } => Some(text),
            TemplateBody::Missing { .. } => None,
        }
    }
}

impl fmt::Display for TemplateBody {
    /// The body text, or the legacy missing-template sentinel
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateBody::Present { text, .. } => f.write_str(text),
            TemplateBody::Missing { template } => write!(
                f,
                "{} template of ID {} is missing",
                template.kind, template.id
            ),
        }
    }
}

/// First-stage comparison of two template bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RawOutcome {
    /// Bodies are byte-identical
    Identical,
    /// One side has no stored body; `version` is the release lacking it
    Missing {
        culprit: TemplateRef,
        version: SatVersion,
    },
    /// Bodies differ; variant evaluation decides
    Differs { before: String, after: String },
}

impl RawOutcome {
    /// `("true", "true")`, `(culprit, " missing in Version <X>")` or `(before, after)`
    pub fn legacy_pair(&self) -> (String, String) {
        match self {
            RawOutcome::Identical => ("true".to_string(), "true".to_string()),
            RawOutcome::Missing { culprit, version } => {
                (culprit.to_string(), format!(" missing in Version {}", version))
            }
            RawOutcome::Differs { before, after } => (before.clone(), after.clone()),
        }
    }
}

/// A changed line accounted for by a variant rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantMatch {
    pub line: DiffLine,
    pub rule: String,
}

/// Result of evaluating a diff against the variant rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantVerdict {
    pub accepted: bool,
    /// First changed line covered by a rule, added lines examined before removed ones
    pub matched: Option<VariantMatch>,
    /// Changed lines no rule covers
    pub unexplained: Vec<DiffLine>,
    /// Full diff listing
    pub diff: Vec<DiffLine>,
}

impl VariantVerdict {
    /// True only if every changed line is covered by some rule
    pub fn fully_explained(&self) -> bool {
        self.unexplained.is_empty()
    }
}

/// Complete evaluation of one template across the upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateComparison {
    pub kind: TemplateKind,
    pub id: String,
    pub outcome: RawOutcome,
    /// Present only when the bodies differ
    pub verdict: Option<VariantVerdict>,
}

impl TemplateComparison {
    pub fn passed(&self) -> bool {
        match &self.outcome {
            RawOutcome::Identical => true,
            RawOutcome::Missing { .. } => false,
            RawOutcome::Differs { .. } => self.verdict.as_ref().is_some_and(|v| v.accepted),
        }
    }
}
