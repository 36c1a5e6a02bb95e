//! One-way hashing for pseudonymized fields.
//!
//! Without a key, fields are hashed with plain SHA-256. With a key, HMAC-SHA256
//! is used so that tokens can't be reversed by hashing a dictionary of
//! known addresses or user names. Output is lowercase hex in both cases.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{EnrichError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Deterministic field hasher.
#[derive(Clone)]
pub struct FieldHasher {
    keyed: Option<HmacSha256>,
}

impl FieldHasher {
    /// Build a hasher for `key`. An empty key selects unkeyed SHA-256.
    pub fn new(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Ok(Self::unkeyed());
        }
        let mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| EnrichError::HashKey(e.to_string()))?;
        Ok(Self { keyed: Some(mac) })
    }

    pub fn unkeyed() -> Self {
        Self { keyed: None }
    }

    pub fn is_keyed(&self) -> bool {
        self.keyed.is_some()
    }

    pub fn hash(&self, input: &str) -> String {
        match &self.keyed {
            Some(mac) => {
                let mut mac = mac.clone();
                mac.update(input.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
            None => compute_hash(input),
        }
    }
}

// The MAC state holds the key.
impl fmt::Debug for FieldHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHasher")
            .field("keyed", &self.is_keyed())
            .finish()
    }
}

/// Compute SHA256 hash of content.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}
