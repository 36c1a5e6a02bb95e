//! MailArchiver Core - log record enrichment and pseudonymization
//!
//! This crate provides the record processor for MailArchiver's log
//! pipeline. Every mail event record gets the site, user and client
//! address it came from attached under `extra`, and, depending on the
//! privacy settings, those fields are replaced by one-way hashes before
//! the record reaches any sink.
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `record` - Log record model and `extra` keys
//! - `context` - Per-request client context and address resolution
//! - `security` - Field hashing (SHA-256 / HMAC-SHA256)
//! - `processor` - The enricher, its configuration, processor stack, registry
//! - `pipeline` - Batch enrichment of JSON-encoded records
//! - `logging` - Structured logging with batch context
//!
//! With the `python` feature the crate also builds the
//! `mailarchiver_core` extension module for the Python-side pipeline.

pub mod context;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod processor;
pub mod record;
pub mod security;

pub use context::{ClientContext, IpSources};
pub use error::{EnrichError, Result};
pub use processor::{EnrichmentConfig, EnrichmentReport, ProcessorStack, RecordEnricher, RecordProcessor};
pub use record::LogRecord;

#[cfg(feature = "python")]
mod python {
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use pyo3::types::{PyDict, PyList};

    use crate::context::ClientContext;
    use crate::error::EnrichError;
    use crate::logging::structured::init_logger;
    use crate::pipeline::batch::process_batch;
    use crate::pipeline::context::BatchContext;
    use crate::processor::{registry, EnrichmentConfig};
    use crate::record::LogRecord;

    fn to_py_err(e: EnrichError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }

    fn client_context(context_json: Option<&str>) -> PyResult<ClientContext> {
        match context_json {
            Some(json) => ClientContext::from_json(json).map_err(to_py_err),
            None => Ok(ClientContext::default()),
        }
    }

    /// Configure the process-wide enricher.
    ///
    /// # Arguments
    /// * `anonymize` - Hash the client address and user fields
    /// * `hash_key` - Key for HMAC-SHA256; empty selects plain SHA-256
    /// * `obfuscate_ip` - Override `anonymize` for the client address
    /// * `pseudonymize_user` - Override `anonymize` for the user fields
    #[pyfunction]
    #[pyo3(signature = (anonymize=true, hash_key="".to_string(), obfuscate_ip=None, pseudonymize_user=None))]
    fn configure_enricher(
        anonymize: bool,
        hash_key: String,
        obfuscate_ip: Option<bool>,
        pseudonymize_user: Option<bool>,
    ) -> PyResult<()> {
        init_logger();

        let config = EnrichmentConfig {
            anonymize,
            hash_key,
            obfuscate_ip,
            pseudonymize_user,
        };
        registry::configure_enricher(config).map_err(to_py_err)?;
        Ok(())
    }

    /// Configure the process-wide enricher from a JSON settings object.
    #[pyfunction]
    fn configure_enricher_json(config_json: &str) -> PyResult<()> {
        init_logger();

        let config = EnrichmentConfig::from_json(config_json).map_err(to_py_err)?;
        registry::configure_enricher(config).map_err(to_py_err)?;
        Ok(())
    }

    /// Enrich a single JSON-encoded record.
    ///
    /// Returns the enriched record as JSON.
    #[pyfunction]
    #[pyo3(signature = (record_json, context_json=None))]
    fn enrich_record(record_json: &str, context_json: Option<&str>) -> PyResult<String> {
        let client = client_context(context_json)?;
        let record = LogRecord::from_json(record_json).map_err(to_py_err)?;

        let enriched = registry::get_enricher().enrich(record, &client);
        enriched.to_json().map_err(to_py_err)
    }

    /// Enrich a batch of JSON-encoded records against one client context.
    ///
    /// # Returns
    /// Dict with batch counts and a `records` list; each entry carries
    /// `index`, `accepted`, and either `record` or `rejection_reason`.
    #[pyfunction]
    #[pyo3(signature = (events, context_json=None, batch_timestamp=None))]
    fn process_record_batch(
        py: Python<'_>,
        events: Vec<String>,
        context_json: Option<&str>,
        batch_timestamp: Option<&str>,
    ) -> PyResult<Py<PyAny>> {
        init_logger();

        let client = client_context(context_json)?;
        let ctx = BatchContext::new(batch_timestamp);

        log::info!(
            "BATCH_RECEIVED batch_id={} records={}",
            ctx.batch_id,
            events.len()
        );

        let enricher = registry::get_enricher();
        let result = process_batch(&ctx, &enricher, &client, &events);

        let py_result = PyDict::new(py);
        py_result.set_item("batch_id", &ctx.batch_id)?;
        py_result.set_item("batch_timestamp", ctx.batch_timestamp.to_rfc3339())?;
        py_result.set_item("received_count", result.received_count)?;
        py_result.set_item("accepted_count", result.accepted_count)?;
        py_result.set_item("rejected_count", result.rejected_count)?;

        let records_list = PyList::empty(py);
        for record in result.records {
            let record_dict = PyDict::new(py);
            record_dict.set_item("index", record.index)?;
            record_dict.set_item("accepted", record.accepted)?;
            record_dict.set_item("fields_hashed", record.fields_hashed)?;

            if let Some(json) = &record.record {
                record_dict.set_item("record", json)?;
            }
            if let Some(reason) = &record.rejection_reason {
                record_dict.set_item("rejection_reason", reason)?;
            }

            records_list.append(record_dict)?;
        }
        py_result.set_item("records", records_list)?;

        Ok(py_result.into())
    }

    /// Get the active privacy switches.
    ///
    /// Returns (obfuscate_ip, pseudonymize_user, keyed)
    #[pyfunction]
    fn get_enricher_status() -> PyResult<(bool, bool, bool)> {
        let enricher = registry::get_enricher();
        let config = enricher.config();
        Ok((
            config.ip_obfuscation_enabled(),
            config.user_pseudonymization_enabled(),
            enricher.is_keyed(),
        ))
    }

    /// Restore the default enricher configuration.
    #[pyfunction]
    fn reset_enricher() -> PyResult<()> {
        init_logger();
        registry::reset_enricher();
        Ok(())
    }

    /// Python module definition
    #[pymodule]
    fn mailarchiver_core(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(configure_enricher, m)?)?;
        m.add_function(wrap_pyfunction!(configure_enricher_json, m)?)?;
        m.add_function(wrap_pyfunction!(enrich_record, m)?)?;
        m.add_function(wrap_pyfunction!(process_record_batch, m)?)?;
        m.add_function(wrap_pyfunction!(get_enricher_status, m)?)?;
        m.add_function(wrap_pyfunction!(reset_enricher, m)?)?;
        Ok(())
    }
}
