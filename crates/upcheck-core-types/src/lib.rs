//! Core types shared across upcheck facilities
//!
//! - **Schema constants**: Canonical field keys and event names used by the
//!   logging macros and the test capture layer

pub mod schema;
