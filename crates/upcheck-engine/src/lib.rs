//! upcheck Engine - Orchestration layer
//!
//! Provides high-level command orchestration that loads artifacts from the
//! stores and runs the core correlation and diff logic over them.

pub mod commands;
