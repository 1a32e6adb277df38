//! Log record representation shipped by the handler.
//!
//! A [`LogRecord`] captures a single log event together with the metadata
//! the Log API understands: the originating logger, a severity, a UTC
//! timestamp, and free-form string attributes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::level::Level;

/// A single log event.
#[derive(Clone, Debug)]
pub struct LogRecord {
    /// Name of the logger that created this record.
    pub logger: String,
    /// Severity of the event.
    pub level: Level,
    /// The log message content.
    pub message: String,
    /// Time the record was created.
    pub timestamp: DateTime<Utc>,
    /// Structured key-value pairs attached to the record.
    pub attributes: BTreeMap<String, String>,
}

impl LogRecord {
    /// Construct a new log record stamped with the current time.
    pub fn new(logger: &str, level: Level, message: &str) -> Self {
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            timestamp: Utc::now(),
            attributes: BTreeMap::new(),
        }
    }

    /// Construct a log record carrying explicit attributes.
    pub fn with_attributes(
        logger: &str,
        level: Level,
        message: &str,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            timestamp: Utc::now(),
            attributes,
        }
    }

    /// Epoch timestamp in milliseconds, the unit the ingest endpoint expects.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.message)
    }
}
