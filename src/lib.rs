//! Log handler shipping application log records to the New Relic Log API.
//!
//! The crate provides a single handler, [`LogApiHandler`], designed to be
//! registered inside a host application's logging pipeline and invoked
//! once per record or batch. The ingest host is derived from the license
//! key's region prefix (`eu01x…` keys route to `log-api.eu.newrelic.com`)
//! unless an explicit host is configured, and every payload is shipped
//! with a single best-effort HTTPS POST.
//!
//! ```no_run
//! use newrelic_log_handler::{Handler, Level, LogApiHandler, LogRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = LogApiHandler::builder()
//!     .with_license_key("eu01xx2c1e0b7ca9f7e8d6a2c4b0f852")
//!     .build()?;
//! handler.handle(LogRecord::new("app.core", Level::Info, "service started"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Delivery is fire and forget: failures never propagate out of
//! [`Handler::handle`], and the raw [`send_payload`] /
//! [`send_batch_payload`] methods report the outcome as a [`Delivery`]
//! value for callers that want to observe it.
//!
//! [`send_payload`]: LogApiHandler::send_payload
//! [`send_batch_payload`]: LogApiHandler::send_batch_payload

mod handler;
mod handlers;
mod level;
mod log_api_handler;
mod log_record;
mod rate_limited_warner;

pub use handler::{Handler, HandlerError};
pub use handlers::{HandlerBuildError, HandlerBuilderTrait, LogApiHandlerBuilder};
pub use level::Level;
pub use log_api_handler::{
    ConfigError, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_INGEST_HOST, DEFAULT_PROTOCOL,
    DEFAULT_SEND_TIMEOUT, Delivery, HOST_ENV, LICENSE_KEY_ENV, LogApiConfig, LogApiHandler,
    UNSET_LICENSE_KEY, region_of, resolve_default_host, serialise_batch, serialise_record,
};
pub use log_record::LogRecord;
pub use rate_limited_warner::{DEFAULT_WARN_INTERVAL, RateLimitedWarner};
