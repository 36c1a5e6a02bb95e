//! Client context module.
//!
//! Site, user and address information resolved by the caller for each
//! record.

pub mod client;

pub use client::*;
