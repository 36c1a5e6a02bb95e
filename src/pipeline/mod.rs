//! Pipeline orchestration module.
//!
//! Batch enrichment for the host pipeline:
//! - Record decoding
//! - Enrichment and pseudonymization
//! - Per-record acceptance reporting

pub mod batch;
pub mod context;

pub use batch::*;
pub use context::*;
