//! Record processor module.
//!
//! The enricher, its configuration, the processor seam the pipeline calls
//! through, and the process-wide enricher registry.

pub mod config;
pub mod enricher;
pub mod registry;
pub mod stack;

pub use config::*;
pub use enricher::*;
pub use registry::*;
pub use stack::*;
