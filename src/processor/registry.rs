//! Process-wide enricher used by the Python entry points.
//!
//! Callers get an `Arc` snapshot, so reconfiguring never affects a call
//! already in flight.

use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::error::Result;

use super::config::EnrichmentConfig;
use super::enricher::RecordEnricher;

lazy_static! {
    static ref ENRICHER: RwLock<Arc<RecordEnricher>> =
        RwLock::new(Arc::new(RecordEnricher::default()));
}

/// Get the currently configured enricher.
pub fn get_enricher() -> Arc<RecordEnricher> {
    ENRICHER.read().clone()
}

/// Replace the configured enricher.
///
/// The previous enricher stays in place if `config` is rejected.
pub fn configure_enricher(config: EnrichmentConfig) -> Result<Arc<RecordEnricher>> {
    let enricher = Arc::new(RecordEnricher::new(config)?);
    *ENRICHER.write() = Arc::clone(&enricher);

    log::info!(
        "ENRICHER_CONFIGURED obfuscate_ip={} pseudonymize_user={} keyed={}",
        enricher.config().ip_obfuscation_enabled(),
        enricher.config().user_pseudonymization_enabled(),
        enricher.is_keyed()
    );

    Ok(enricher)
}

/// Restore the default configuration.
pub fn reset_enricher() {
    *ENRICHER.write() = Arc::new(RecordEnricher::default());
    log::info!("ENRICHER_RESET");
}
