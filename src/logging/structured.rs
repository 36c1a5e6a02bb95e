//! Structured logging utilities.
//!
//! Provides context-aware logging with batch_id and record index included
//! in every log message.

use std::fmt;

/// Logging context for a batch of records.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub batch_id: String,
    pub record: Option<usize>,
}

impl LogContext {
    pub fn new(batch_id: &str) -> Self {
        Self {
            batch_id: batch_id.to_string(),
            record: None,
        }
    }

    pub fn with_record(&self, index: usize) -> Self {
        Self {
            batch_id: self.batch_id.clone(),
            record: Some(index),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(index) => write!(f, "[batch={}] [record={}]", self.batch_id, index),
            None => write!(f, "[batch={}]", self.batch_id),
        }
    }
}

/// Initialize the module-level logger.
///
/// Safe to call repeatedly; only the first call installs the logger.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Log an info message with context and `key=value` pairs.
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::info!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        );
    };
}

/// Log a warning message with context and `key=value` pairs.
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        );
    };
}

/// Log a debug message with context and `key=value` pairs.
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),+ $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={:?} "),+), $($value),+)
        );
    };
}
