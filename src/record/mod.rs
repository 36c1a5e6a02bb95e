//! Log record module.
//!
//! The record shape processors operate on and the `extra` keys they write.

pub mod keys;
pub mod model;

pub use model::*;
