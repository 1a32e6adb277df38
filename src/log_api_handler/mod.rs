//! Log API handler implementation.
//!
//! This module defines [`LogApiHandler`], a handler that serialises
//! [`LogRecord`](crate::log_record::LogRecord) values and forwards them to
//! the New Relic Log API over HTTPS. The target host is derived from the
//! license key's region prefix unless an explicit host is configured.
//!
//! # Delivery semantics
//!
//! Shipping is best effort and fire-and-forget:
//!
//! - Each call performs exactly one blocking POST, bounded by the
//!   configured timeouts.
//! - Network failures, non-2xx responses, and timeouts are swallowed;
//!   callers observe them only through the [`Delivery`] value returned by
//!   the raw payload methods and through rate-limited warnings.
//! - There is no retry, no backoff, and no queue.

mod config;
mod endpoint;
mod handler;
mod serialise;
mod transport;

#[cfg(test)]
mod tests;

pub use config::{
    ConfigError, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_PROTOCOL, DEFAULT_SEND_TIMEOUT,
    HOST_ENV, LICENSE_KEY_ENV, LogApiConfig, UNSET_LICENSE_KEY,
};
pub use endpoint::{DEFAULT_INGEST_HOST, region_of, resolve_default_host};
pub use handler::LogApiHandler;
pub use serialise::{serialise_batch, serialise_record};
pub use transport::Delivery;
