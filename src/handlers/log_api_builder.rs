//! Builder for [`LogApiHandler`](crate::log_api_handler::LogApiHandler).
//!
//! Exposes the license key, host override, endpoint path, timeouts, and
//! TLS verification. Unset fields fall back to the defaults of
//! [`LogApiConfig`].

use std::time::Duration;

use crate::log_api_handler::{LogApiConfig, LogApiHandler};

use super::{HandlerBuildError, HandlerBuilderTrait};

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(HandlerBuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`LogApiHandler`] instances.
#[derive(Clone, Debug, Default)]
pub struct LogApiHandlerBuilder {
    license_key: Option<String>,
    host: Option<String>,
    endpoint: Option<String>,
    send_timeout_ms: Option<u64>,
    connect_timeout_ms: Option<u64>,
    verify_tls: Option<bool>,
    warn_interval_ms: Option<u64>,
}

impl LogApiHandlerBuilder {
    /// Create a new builder with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the license key used for authentication and host derivation.
    pub fn with_license_key(mut self, license_key: impl Into<String>) -> Self {
        self.license_key = Some(license_key.into());
        self
    }

    /// Pin the ingest host, bypassing derivation from the license key.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the endpoint path suffix.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Control TLS peer verification. Defaults to enabled; disable only
    /// for test endpoints with self-signed certificates.
    pub fn with_tls_verification(mut self, verify: bool) -> Self {
        self.verify_tls = Some(verify);
        self
    }

    option_setter!(
        #[doc = "Set the per-send timeout in milliseconds."]
        with_send_timeout_ms,
        send_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the connect timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the interval between delivery-failure warnings in milliseconds."]
        with_warn_interval_ms,
        warn_interval_ms,
        u64
    );

    /// Build the handler, validating the configuration first.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerBuildError::InvalidConfig`] for an empty endpoint
    /// or zero timeouts, and [`HandlerBuildError::Tls`] when the TLS
    /// backend cannot be initialised.
    pub fn build(&self) -> Result<LogApiHandler, HandlerBuildError> {
        self.build_inner()
    }

    fn validate(&self) -> Result<(), HandlerBuildError> {
        if let Some(endpoint) = &self.endpoint
            && endpoint.trim().is_empty()
        {
            return Err(HandlerBuildError::InvalidConfig(
                "endpoint must not be empty".into(),
            ));
        }
        if let Some(timeout) = self.send_timeout_ms {
            ensure_positive!(timeout, "send_timeout_ms")?;
        }
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout_ms")?;
        }
        Ok(())
    }

    fn build_config(&self) -> Result<LogApiConfig, HandlerBuildError> {
        self.validate()?;

        let defaults = LogApiConfig::default();
        Ok(LogApiConfig {
            license_key: self.license_key.clone().unwrap_or(defaults.license_key),
            host: self.host.clone(),
            endpoint: self.endpoint.clone().unwrap_or(defaults.endpoint),
            protocol: defaults.protocol,
            send_timeout: self
                .send_timeout_ms
                .map_or(defaults.send_timeout, Duration::from_millis),
            connect_timeout: self
                .connect_timeout_ms
                .map_or(defaults.connect_timeout, Duration::from_millis),
            verify_tls: self.verify_tls.unwrap_or(defaults.verify_tls),
            warn_interval: self
                .warn_interval_ms
                .map_or(defaults.warn_interval, Duration::from_millis),
        })
    }
}

impl HandlerBuilderTrait for LogApiHandlerBuilder {
    type Handler = LogApiHandler;

    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError> {
        let config = self.build_config()?;
        LogApiHandler::with_config(config)
    }
}
