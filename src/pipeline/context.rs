//! Pipeline context management.
//!
//! Provides batch context for logging and result tagging.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for a batch of records.
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub batch_id: String,
    pub batch_timestamp: DateTime<Utc>,
}

impl BatchContext {
    /// `batch_timestamp` is RFC 3339; anything else falls back to now.
    pub fn new(batch_timestamp: Option<&str>) -> Self {
        let batch_id = format!("batch-{}", &Uuid::new_v4().simple().to_string()[..8]);

        let batch_timestamp = batch_timestamp
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Self {
            batch_id,
            batch_timestamp,
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.batch_id)
    }

    /// Log context for the record at `index` in this batch.
    pub fn record_context(&self, index: usize) -> LogContext {
        self.log_context().with_record(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_id_format() {
        let ctx = BatchContext::new(None);
        assert!(ctx.batch_id.starts_with("batch-"));
        assert_eq!(ctx.batch_id.len(), "batch-".len() + 8);
    }

    #[test]
    fn test_timestamp_parsing() {
        let ctx = BatchContext::new(Some("2026-01-29T10:15:00+02:00"));
        assert_eq!(ctx.batch_timestamp.to_rfc3339(), "2026-01-29T08:15:00+00:00");

        let before = Utc::now();
        let ctx = BatchContext::new(Some("yesterday"));
        assert!(ctx.batch_timestamp >= before);
    }

    #[test]
    fn test_record_context() {
        let ctx = BatchContext::new(None);
        let log_ctx = ctx.record_context(2);
        assert_eq!(log_ctx.record, Some(2));
        assert_eq!(log_ctx.batch_id, ctx.batch_id);
    }
}
