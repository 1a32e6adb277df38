//! Public handler type exported by the crate.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

use crate::{
    handler::{Handler, HandlerError},
    handlers::{HandlerBuildError, LogApiHandlerBuilder},
    log_record::LogRecord,
    rate_limited_warner::RateLimitedWarner,
};

use super::{
    config::LogApiConfig,
    serialise::{serialise_batch, serialise_record},
    transport::{Delivery, LogTransport},
};

/// Handler shipping log records to the Log API.
///
/// Dispatching is best effort: each record or batch is one blocking POST
/// with no retry, and delivery failures never propagate to the caller.
/// Failures are counted and surfaced through rate-limited warnings on the
/// `log` facade instead.
pub struct LogApiHandler {
    transport: LogTransport,
    warner: RateLimitedWarner,
    closed: AtomicBool,
}

impl LogApiHandler {
    /// Construct the handler from a configuration object.
    ///
    /// # Errors
    ///
    /// Fails when the TLS backend cannot be initialised; the handler is
    /// unusable without a working transport.
    pub fn with_config(config: LogApiConfig) -> Result<Self, HandlerBuildError> {
        let warner = RateLimitedWarner::new(config.warn_interval);
        let transport = LogTransport::new(&config)?;
        Ok(Self {
            transport,
            warner,
            closed: AtomicBool::new(false),
        })
    }

    /// Start building a handler.
    pub fn builder() -> LogApiHandlerBuilder {
        LogApiHandlerBuilder::new()
    }

    /// Replace the license key used for authentication and derivation.
    pub fn set_license_key(&self, license_key: impl Into<String>) {
        self.transport.set_license_key(license_key);
    }

    /// Pin the ingest host. Takes precedence over derivation for all
    /// subsequent sends until [`clear_host`](Self::clear_host) is called.
    pub fn set_host(&self, host: impl Into<String>) {
        self.transport.set_host(host);
    }

    /// Remove the explicit host, returning to license-key derivation.
    pub fn clear_host(&self) {
        self.transport.clear_host();
    }

    /// Ship a caller-serialised JSON payload as a single-record request.
    pub fn send_payload(&self, payload: &str) -> Delivery {
        let delivery = self.transport.send(payload);
        self.observe(&delivery);
        delivery
    }

    /// Ship a caller-serialised JSON payload inside the batch envelope.
    pub fn send_batch_payload(&self, payload: &str) -> Delivery {
        let delivery = self.transport.send_batch(payload);
        self.observe(&delivery);
        delivery
    }

    /// Serialise and ship a batch of records in one request.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Closed`] after [`close`](Self::close);
    /// delivery failures are swallowed like [`Handler::handle`].
    pub fn handle_batch(&self, records: &[LogRecord]) -> Result<(), HandlerError> {
        if self.is_closed() {
            return self.refuse();
        }
        match serialise_batch(records) {
            Ok(payload) => {
                let delivery = self.transport.send_batch(&payload);
                self.observe(&delivery);
                Ok(())
            }
            Err(err) => {
                self.drop_unserialisable(&err);
                Ok(())
            }
        }
    }

    /// Stop accepting records. Subsequent dispatches fail with
    /// [`HandlerError::Closed`]; pending failure warnings are flushed.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.warner
            .flush(|count| warn!("LogApiHandler dropped {count} payloads before close"));
    }

    /// `true` once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn refuse(&self) -> Result<(), HandlerError> {
        self.warner.record_drop();
        self.warner
            .warn_if_due(|count| warn!("LogApiHandler dropped {count} records after close"));
        Err(HandlerError::Closed)
    }

    fn drop_unserialisable(&self, err: &serde_json::Error) {
        warn!("LogApiHandler serialisation error: {err}");
        self.warner.record_drop();
        self.warner.warn_if_due(|count| {
            warn!("LogApiHandler dropped {count} payloads due to serialisation failures");
        });
    }

    fn observe(&self, delivery: &Delivery) {
        match delivery {
            Delivery::Accepted { .. } => {}
            Delivery::Rejected { status } => {
                self.warner.record_drop();
                self.warner.warn_if_due(|count| {
                    warn!(
                        "LogApiHandler: ingest endpoint rejected payload \
                         (status {status}); {count} deliveries dropped"
                    );
                });
            }
            Delivery::Failed { reason } => {
                self.warner.record_drop();
                self.warner.warn_if_due(|count| {
                    warn!("LogApiHandler: delivery failed: {reason}; {count} deliveries dropped");
                });
            }
        }
    }
}

impl Handler for LogApiHandler {
    fn handle(&self, record: LogRecord) -> Result<(), HandlerError> {
        if self.is_closed() {
            return self.refuse();
        }
        match serialise_record(&record) {
            Ok(payload) => {
                let delivery = self.transport.send(&payload);
                self.observe(&delivery);
                Ok(())
            }
            Err(err) => {
                self.drop_unserialisable(&err);
                Ok(())
            }
        }
    }

    fn flush(&self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.warner
            .flush(|count| warn!("LogApiHandler dropped {count} payloads in the last interval"));
        true
    }
}

impl fmt::Debug for LogApiHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogApiHandler")
            .field("closed", &self.is_closed())
            .finish()
    }
}
