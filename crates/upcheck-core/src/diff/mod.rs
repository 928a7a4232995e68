//! Template diff engine.
//!
//! Compares rendered template bodies captured before and after an upgrade,
//! tolerating the changes listed in the variant rules for each template kind.
//!
//! ## Entry point
//!
//! ```ignore
//! use upcheck_core::diff::DiffEngine;
//!
//! let engine = DiffEngine::from_config(&config);
//! let comparison = engine.evaluate(kind, &before_body, &after_body);
//! ```
//!
//! ## Guarantees
//!
//! - **Fast path**: byte-identical bodies are accepted without line diffing.
//! - **Missing templates**: reported with the release lacking them, never as errors.
//! - **Lenient acceptance**: a diff passes as soon as one changed line is
//!   covered by a rule. [`VariantVerdict::unexplained`] lists the rest for
//!   callers wanting stricter semantics.

pub mod engine;
pub mod lines;
pub mod model;

pub use engine::{raw_compare, DiffEngine};
pub use lines::{diff_lines, DiffLine};
pub use model::{
    RawOutcome, TemplateBody, TemplateComparison, TemplateRef, VariantMatch, VariantVerdict,
};
