//! Record enrichment.
//!
//! Writes site, user and client-address metadata under a record's `extra`
//! mapping, then pseudonymizes the address and user fields according to
//! the enricher's configuration:
//!
//! 1. `extra.siteid`, `extra.sitename`
//! 2. `extra.userid`, `extra.username`
//! 3. `extra.ip` (real-IP, forwarded-for, peer address, `127.0.0.1`)
//! 4. hash `extra.ip`
//! 5. hash `extra.userid` and `extra.username` when `userid > 0`
//!
//! Later steps read what earlier steps wrote, so the order is fixed and
//! each step runs once per call.

use serde_json::Value;

use crate::context::ClientContext;
use crate::error::Result;
use crate::record::keys::{IP, SITE_ID, SITE_NAME, USER_ID, USER_NAME};
use crate::record::LogRecord;
use crate::security::hash::FieldHasher;

use super::config::EnrichmentConfig;
use super::stack::RecordProcessor;

/// What a single enrichment pass did to a record.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnrichmentReport {
    pub fields_written: usize,
    pub fields_hashed: usize,
}

/// Attaches client metadata to log records and pseudonymizes it.
#[derive(Debug, Clone)]
pub struct RecordEnricher {
    config: EnrichmentConfig,
    hasher: FieldHasher,
}

impl RecordEnricher {
    pub fn new(config: EnrichmentConfig) -> Result<Self> {
        let hasher = FieldHasher::new(&config.hash_key)?;
        Ok(Self { config, hasher })
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    pub fn is_keyed(&self) -> bool {
        self.hasher.is_keyed()
    }

    /// Enrich a record with the given client context.
    pub fn enrich(&self, record: LogRecord, context: &ClientContext) -> LogRecord {
        self.enrich_with_report(record, context).0
    }

    /// Enrich a record and report how many `extra` fields were touched.
    pub fn enrich_with_report(
        &self,
        mut record: LogRecord,
        context: &ClientContext,
    ) -> (LogRecord, EnrichmentReport) {
        let mut report = EnrichmentReport::default();

        if let Some(site_id) = context.site_id {
            record.set_extra(SITE_ID, site_id);
            report.fields_written += 1;
        }
        if let Some(site_name) = &context.site_name {
            record.set_extra(SITE_NAME, site_name.as_str());
            report.fields_written += 1;
        }

        if let Some(user_id) = context.user_id {
            record.set_extra(USER_ID, user_id);
            report.fields_written += 1;
        }
        if let Some(user_name) = &context.user_name {
            record.set_extra(USER_NAME, user_name.as_str());
            report.fields_written += 1;
        }

        record.set_extra(IP, context.client_ip());
        report.fields_written += 1;

        if self.config.ip_obfuscation_enabled() && self.hash_field(&mut record, IP) {
            report.fields_hashed += 1;
        }

        if self.config.user_pseudonymization_enabled()
            && record.extra_value(USER_ID).is_some_and(is_positive_id)
        {
            if self.hash_field(&mut record, USER_ID) {
                report.fields_hashed += 1;
            }
            if self.hash_field(&mut record, USER_NAME) {
                report.fields_hashed += 1;
            }
        }

        (record, report)
    }

    /// Replace `extra[key]` with the hash of its string form, if present.
    fn hash_field(&self, record: &mut LogRecord, key: &str) -> bool {
        let Some(input) = record.extra_value(key).map(hash_input) else {
            return false;
        };
        record.set_extra(key, self.hasher.hash(&input));
        true
    }
}

impl Default for RecordEnricher {
    fn default() -> Self {
        Self {
            config: EnrichmentConfig::default(),
            hasher: FieldHasher::unkeyed(),
        }
    }
}

impl RecordProcessor for RecordEnricher {
    fn name(&self) -> &str {
        "record_enricher"
    }

    fn process(&self, record: LogRecord, context: &ClientContext) -> LogRecord {
        self.enrich(record, context)
    }
}

/// User ids arrive as numbers, or as numeric strings from upstream processors.
fn is_positive_id(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(|id| id > 0.0),
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(|id| id > 0.0),
        _ => false,
    }
}

fn hash_input(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
