//! upcheck Core - Offline upgrade validation kernel
//!
//! This crate provides the pure, I/O-free parts of upgrade validation:
//! - Snapshot data model (component records of heterogeneous entities)
//! - Entity lookup by attribute and by search criteria
//! - Correlation of entities across pre/post-upgrade snapshots by key attribute
//! - Line diffing of rendered templates with variant-rule acceptance
//! - Markdown report rendering for operator review
//!
//! Persistence lives in `upcheck-store`; orchestration in `upcheck-engine`.

pub mod config;
pub mod correlator;
pub mod diff;
pub mod errors;
pub mod locator;
pub mod logging_facility;
pub mod model;
pub mod normalize;
pub mod report;

// Used by the exported logging macros
#[doc(hidden)]
pub use upcheck_core_types;

// Re-export commonly used types
pub use config::{CheckConfig, KeyAttributeTable, VariantRules};
pub use correlator::{Correlation, Correlator};
pub use diff::{DiffEngine, RawOutcome, VariantVerdict};
pub use errors::{CheckError, ExError, ExErrorKind, Result};
pub use locator::Lookup;
pub use model::{
    AttributeSpec, ComponentRecord, EndpointMode, Entity, SatVersion, Snapshot, SnapshotLabel,
    TemplateKind, UpgradePath,
};
