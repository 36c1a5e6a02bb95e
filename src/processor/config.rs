//! Enricher configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EnrichError, Result};

/// Privacy options fixed for the lifetime of an enricher.
///
/// `anonymize` switches both IP obfuscation and user pseudonymization; the
/// per-field overrides take precedence when set.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichmentConfig {
    #[serde(alias = "anonymize_email")]
    pub anonymize: bool,

    #[serde(alias = "hash_salt_or_key")]
    pub hash_key: String,

    pub obfuscate_ip: Option<bool>,

    pub pseudonymize_user: Option<bool>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            anonymize: true,
            hash_key: String::new(),
            obfuscate_ip: None,
            pseudonymize_user: None,
        }
    }
}

impl EnrichmentConfig {
    pub fn new(anonymize: bool, hash_key: impl Into<String>) -> Self {
        Self {
            anonymize,
            hash_key: hash_key.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EnrichError::Config(e.to_string()))
    }

    pub fn ip_obfuscation_enabled(&self) -> bool {
        self.obfuscate_ip.unwrap_or(self.anonymize)
    }

    pub fn user_pseudonymization_enabled(&self) -> bool {
        self.pseudonymize_user.unwrap_or(self.anonymize)
    }
}

impl fmt::Debug for EnrichmentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.hash_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("EnrichmentConfig")
            .field("anonymize", &self.anonymize)
            .field("hash_key", &key)
            .field("obfuscate_ip", &self.obfuscate_ip)
            .field("pseudonymize_user", &self.pseudonymize_user)
            .finish()
    }
}
