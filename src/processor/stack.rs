//! Processor seam for the host log pipeline.

use std::sync::Arc;

use crate::context::ClientContext;
use crate::record::LogRecord;

/// A record transform the pipeline runs before handing records to sinks.
pub trait RecordProcessor: Send + Sync {
    fn name(&self) -> &str;

    fn process(&self, record: LogRecord, context: &ClientContext) -> LogRecord;
}

/// Ordered set of processors. The most recently pushed processor runs first.
#[derive(Default, Clone)]
pub struct ProcessorStack {
    processors: Vec<Arc<dyn RecordProcessor>>,
}

impl ProcessorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, processor: Arc<dyn RecordProcessor>) {
        self.processors.push(processor);
    }

    pub fn pop(&mut self) -> Option<Arc<dyn RecordProcessor>> {
        self.processors.pop()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Processor names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().rev().map(|p| p.name()).collect()
    }

    pub fn process(&self, record: LogRecord, context: &ClientContext) -> LogRecord {
        self.processors
            .iter()
            .rev()
            .fold(record, |record, processor| processor.process(record, context))
    }
}
