//! Serialisation of log records into Log API JSON payloads.
//!
//! A single record becomes one JSON object with `message`, `level`,
//! `logger`, and an epoch-millisecond `timestamp`; record attributes are
//! flattened into the same object. A batch becomes a JSON array of those
//! objects, ready for the batch envelope applied by the transport.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::log_record::LogRecord;

/// Borrowing view of a record in the shape the ingest endpoint expects.
#[derive(Serialize)]
struct LogApiRecord<'a> {
    message: &'a str,
    level: &'static str,
    logger: &'a str,
    timestamp: i64,
    #[serde(flatten)]
    attributes: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a LogRecord> for LogApiRecord<'a> {
    fn from(record: &'a LogRecord) -> Self {
        Self {
            message: &record.message,
            level: record.level.as_str(),
            logger: &record.logger,
            timestamp: record.timestamp_millis(),
            attributes: &record.attributes,
        }
    }
}

/// Serialise a single record to a Log API JSON object.
///
/// # Errors
///
/// Returns an error if JSON serialisation fails.
pub fn serialise_record(record: &LogRecord) -> serde_json::Result<String> {
    serde_json::to_string(&LogApiRecord::from(record))
}

/// Serialise a batch of records to a JSON array of Log API objects.
///
/// # Errors
///
/// Returns an error if JSON serialisation fails.
pub fn serialise_batch(records: &[LogRecord]) -> serde_json::Result<String> {
    let views: Vec<LogApiRecord<'_>> = records.iter().map(LogApiRecord::from).collect();
    serde_json::to_string(&views)
}
