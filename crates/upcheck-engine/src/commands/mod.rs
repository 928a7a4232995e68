//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and persistence layer.

pub mod engine_command;
pub mod entities;
pub mod templates;

pub use engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use entities::{compare_entities, EntityComparison};
pub use templates::{compare_templates, TemplateRun};
