use thiserror::Error;

use crate::log_record::LogRecord;

/// Errors surfaced to callers dispatching records to a handler.
///
/// Delivery problems are deliberately absent: shipping is best effort and
/// failures are reported through rate-limited warnings, never to the
/// caller of [`Handler::handle`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler has been closed and no longer accepts records.
    #[error("handler is closed")]
    Closed,
}

/// Trait implemented by all log handlers.
///
/// Handlers are `Send + Sync` so a host pipeline can invoke them from
/// multiple threads. Each call is an independent, blocking dispatch; no
/// ordering between concurrent calls is implied.
pub trait Handler: Send + Sync {
    /// Dispatch a log record for handling.
    fn handle(&self, record: LogRecord) -> Result<(), HandlerError>;

    /// Flush any buffered state, returning `true` on success.
    fn flush(&self) -> bool {
        true
    }
}
