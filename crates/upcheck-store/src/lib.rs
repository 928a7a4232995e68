//! upcheck Store - Persistence of snapshots, templates and configuration
//!
//! Provides:
//! - Snapshot store keyed by (label, endpoint), write-once
//! - Template store keyed by (state, kind, id)
//! - Filesystem and in-memory implementations of both
//! - YAML configuration loader

pub mod config;
pub mod errors;
pub mod fs;
pub mod snapshot;
pub mod template;

// Re-export key types
pub use errors::Result;
pub use snapshot::{FsSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use template::{FsTemplateStore, MemoryTemplateStore, TemplateStore};
