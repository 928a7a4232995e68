//! Snapshot and template data model.

pub mod labels;
pub mod snapshot;
pub mod version;

pub use labels::{EndpointMode, SnapshotLabel, TemplateKind};
pub use snapshot::{ComponentRecord, Entity, Snapshot};
pub use version::{AttributeSpec, ResolvedAttribute, SatVersion, UpgradePath};
