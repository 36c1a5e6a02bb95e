//! Security module.
//!
//! Provides the one-way hashing used to pseudonymize record fields.

pub mod hash;

pub use hash::*;
