//! Handler builders and associated traits.
//!
//! Provides a minimal builder API for constructing handlers in a
//! type-safe manner. Validation happens at build time so a handler that
//! constructs successfully is ready to ship records.

use thiserror::Error;

mod log_api_builder;

pub use log_api_builder::LogApiHandlerBuilder;

/// Errors that may occur while building a handler.
#[derive(Debug, Error)]
pub enum HandlerBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid handler configuration: {0}")]
    InvalidConfig(String),
    /// The TLS backend could not be initialised.
    #[error("failed to initialise TLS: {0}")]
    Tls(#[from] native_tls::Error),
}

/// Trait implemented by all handler builders.
pub trait HandlerBuilderTrait: Send + Sync {
    /// Concrete handler type produced by this builder.
    type Handler;

    /// Build the handler instance.
    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError>;
}
