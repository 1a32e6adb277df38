//! Configuration consumed by the Log API handler.
//!
//! The handler never reads process-global state on its own: callers build a
//! [`LogApiConfig`] explicitly, optionally through the [`from_env`] and
//! [`from_ini_file`] lookup helpers, and pass it in at construction time.
//!
//! [`from_env`]: LogApiConfig::from_env
//! [`from_ini_file`]: LogApiConfig::from_ini_file

use std::env;
use std::path::Path;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::rate_limited_warner::DEFAULT_WARN_INTERVAL;

/// Path suffix of the log ingestion endpoint.
pub const DEFAULT_ENDPOINT: &str = "log/v1";
/// Scheme used for ingest URLs.
pub const DEFAULT_PROTOCOL: &str = "https://";
/// Sentinel shipped when no license key has been configured.
///
/// The ingest endpoint rejects it, but requests stay well-formed: the
/// license header is never empty at send time.
pub const UNSET_LICENSE_KEY: &str = "NO_LICENSE_KEY";
/// Fixed timeout applied to each send attempt.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout applied when establishing connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable consulted by [`LogApiConfig::from_env`].
pub const LICENSE_KEY_ENV: &str = "NEW_RELIC_LICENSE_KEY";
/// Environment variable overriding the ingest host in [`LogApiConfig::from_env`].
pub const HOST_ENV: &str = "NEW_RELIC_HOST";

const INI_SECTION: &str = "newrelic";

/// Errors raised by the configuration lookup helpers.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The INI file could not be read or parsed.
    #[error(transparent)]
    Ini(#[from] ini::Error),
}

/// Configuration object describing how to construct a
/// [`LogApiHandler`](super::LogApiHandler).
#[derive(Clone, Debug)]
pub struct LogApiConfig {
    /// License key used for the auth header and, absent an explicit host,
    /// for region derivation. An empty value is replaced by
    /// [`UNSET_LICENSE_KEY`] at send time.
    pub license_key: String,
    /// Explicit ingest host. When set it always takes precedence over
    /// derivation from the license key.
    pub host: Option<String>,
    /// Path suffix appended to the ingest host.
    pub endpoint: String,
    /// URL scheme prepended to the ingest host.
    pub protocol: String,
    /// Timeout for each send attempt.
    pub send_timeout: Duration,
    /// Timeout for establishing connections.
    pub connect_timeout: Duration,
    /// Verify the TLS peer certificate. Disabling this downgrades transport
    /// security and is intended for test endpoints only.
    pub verify_tls: bool,
    /// Interval between rate-limited warnings about failed deliveries.
    pub warn_interval: Duration,
}

impl Default for LogApiConfig {
    fn default() -> Self {
        Self {
            license_key: UNSET_LICENSE_KEY.to_owned(),
            host: None,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            protocol: DEFAULT_PROTOCOL.to_owned(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            verify_tls: true,
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}

impl LogApiConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads the license key from [`LICENSE_KEY_ENV`] and an optional host
    /// override from [`HOST_ENV`]; unset or empty variables leave the
    /// defaults in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = env::var(LICENSE_KEY_ENV)
            && !key.is_empty()
        {
            config.license_key = key;
        }
        if let Ok(host) = env::var(HOST_ENV)
            && !host.is_empty()
        {
            config.host = Some(host);
        }
        config
    }

    /// Build a configuration from the `[newrelic]` section of an INI file.
    ///
    /// Recognised keys are `license_key` and `host`; anything else in the
    /// file is ignored. A missing section yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_ini_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path.as_ref())?;
        let mut config = Self::default();
        if let Some(section) = ini.section(Some(INI_SECTION)) {
            if let Some(key) = section.get("license_key")
                && !key.is_empty()
            {
                config.license_key = key.to_owned();
            }
            if let Some(host) = section.get("host")
                && !host.is_empty()
            {
                config.host = Some(host.to_owned());
            }
        }
        Ok(config)
    }

    /// License key with the empty-value fallback applied.
    pub(crate) fn effective_license_key(&self) -> &str {
        if self.license_key.is_empty() {
            UNSET_LICENSE_KEY
        } else {
            &self.license_key
        }
    }
}
