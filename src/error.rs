//! Error types.
//!
//! Enrichment itself never fails. These errors come from the surfaces
//! around it: decoding records, parsing configuration, building the hasher.

use thiserror::Error;

/// Top-level error type for the crate.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid hash key: {0}")]
    HashKey(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnrichError>;
