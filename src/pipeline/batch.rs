//! Batch enrichment.
//!
//! Enriches a batch of JSON-encoded records against one client context:
//! 1. Decode each record
//! 2. Enrich it
//! 3. Re-encode it
//!
//! A record that fails to decode is rejected with a reason; the rest of
//! the batch still goes through.

use crate::context::ClientContext;
use crate::logging::structured::LogContext;
use crate::processor::enricher::RecordEnricher;
use crate::record::LogRecord;
use crate::{log_debug, log_info, log_warn};

use super::context::BatchContext;

/// Result of processing a single record.
#[derive(Debug, Clone)]
pub struct RecordResult {
    pub index: usize,
    pub accepted: bool,
    pub record: Option<String>,
    pub rejection_reason: Option<String>,
    pub fields_hashed: usize,
}

/// Result of processing a batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub received_count: usize,
    pub accepted_count: usize,
    pub rejected_count: usize,
    pub records: Vec<RecordResult>,
}

/// Enrich every record in `events`.
pub fn process_batch(
    ctx: &BatchContext,
    enricher: &RecordEnricher,
    client: &ClientContext,
    events: &[String],
) -> BatchResult {
    let records: Vec<RecordResult> = events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            process_single_record(enricher, client, event, &ctx.record_context(index), index)
        })
        .collect();

    let accepted = records.iter().filter(|r| r.accepted).count();
    let rejected = records.len() - accepted;

    log_info!(
        ctx.log_context(),
        "BATCH_COMPLETE",
        received = events.len(),
        accepted = accepted,
        rejected = rejected,
    );

    BatchResult {
        received_count: events.len(),
        accepted_count: accepted,
        rejected_count: rejected,
        records,
    }
}

fn process_single_record(
    enricher: &RecordEnricher,
    client: &ClientContext,
    event_json: &str,
    log_ctx: &LogContext,
    index: usize,
) -> RecordResult {
    let record = match LogRecord::from_json(event_json) {
        Ok(record) => record,
        Err(e) => {
            log_warn!(log_ctx, "RECORD_PARSE_FAILED", error = e.to_string());
            return RecordResult::rejected(index, e.to_string());
        }
    };

    let (enriched, report) = enricher.enrich_with_report(record, client);

    log_debug!(
        log_ctx,
        "RECORD_ENRICHED",
        fields_written = report.fields_written,
        fields_hashed = report.fields_hashed,
    );

    match enriched.to_json() {
        Ok(json) => RecordResult {
            index,
            accepted: true,
            record: Some(json),
            rejection_reason: None,
            fields_hashed: report.fields_hashed,
        },
        Err(e) => {
            log_warn!(log_ctx, "RECORD_ENCODE_FAILED", error = e.to_string());
            RecordResult::rejected(index, e.to_string())
        }
    }
}

impl RecordResult {
    fn rejected(index: usize, reason: String) -> Self {
        Self {
            index,
            accepted: false,
            record: None,
            rejection_reason: Some(reason),
            fields_hashed: 0,
        }
    }
}
