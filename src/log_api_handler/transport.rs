//! Blocking HTTPS transport performing the per-call POST.
//!
//! Each send is one attempt: resolve the target host, POST the payload,
//! classify the outcome. There is no retry, no backoff, and no queue; the
//! calling thread blocks for at most the configured timeouts.

use std::sync::Arc;

use parking_lot::RwLock;
use ureq::{Agent, AgentBuilder};

use crate::handlers::HandlerBuildError;

use super::config::{LogApiConfig, UNSET_LICENSE_KEY};
use super::endpoint::resolve_default_host;

/// Outcome of a single delivery attempt.
///
/// Sending never raises: every attempt maps to one of these variants so
/// the caller can observe failures without having to handle an error path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The endpoint acknowledged the payload with a 2xx status.
    Accepted { status: u16 },
    /// The endpoint answered with a non-success status.
    Rejected { status: u16 },
    /// The request never completed: connect failure, TLS failure, timeout.
    Failed { reason: String },
}

impl Delivery {
    /// `true` when the endpoint acknowledged the payload.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Mutable routing state shared with the handler's setters.
struct SendTarget {
    license_key: String,
    host: Option<String>,
}

/// Transport owning the HTTP agent and the per-call routing state.
pub(crate) struct LogTransport {
    agent: Agent,
    protocol: String,
    endpoint: String,
    target: RwLock<SendTarget>,
}

impl LogTransport {
    /// Build the transport from a configuration snapshot.
    ///
    /// # Errors
    ///
    /// Fails when the TLS backend cannot be initialised; the handler cannot
    /// be constructed without a working transport.
    pub(crate) fn new(config: &LogApiConfig) -> Result<Self, HandlerBuildError> {
        let tls = tls_connector(config.verify_tls)?;
        let agent = AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout(config.send_timeout)
            .tls_connector(Arc::new(tls))
            .build();
        Ok(Self {
            agent,
            protocol: config.protocol.clone(),
            endpoint: config.endpoint.clone(),
            target: RwLock::new(SendTarget {
                license_key: config.effective_license_key().to_owned(),
                host: config.host.clone(),
            }),
        })
    }

    pub(crate) fn set_license_key(&self, license_key: impl Into<String>) {
        self.target.write().license_key = license_key.into();
    }

    pub(crate) fn set_host(&self, host: impl Into<String>) {
        self.target.write().host = Some(host.into());
    }

    pub(crate) fn clear_host(&self) {
        self.target.write().host = None;
    }

    /// POST a pre-serialised JSON payload to the ingest endpoint.
    ///
    /// The payload is forwarded verbatim; no JSON validation is performed.
    pub(crate) fn send(&self, payload: &str) -> Delivery {
        self.post(payload)
    }

    /// POST a pre-serialised JSON payload wrapped in the batch envelope.
    pub(crate) fn send_batch(&self, payload: &str) -> Delivery {
        self.post(&batch_envelope(payload))
    }

    /// Snapshot the routing state: the license key with the empty-value
    /// fallback applied, and the target URL.
    fn current_route(&self) -> (String, String) {
        let target = self.target.read();
        let license_key = if target.license_key.is_empty() {
            UNSET_LICENSE_KEY.to_owned()
        } else {
            target.license_key.clone()
        };
        let host = target
            .host
            .clone()
            .unwrap_or_else(|| resolve_default_host(&license_key));
        drop(target);
        let url = format!("{}{}/{}", self.protocol, host, self.endpoint);
        (license_key, url)
    }

    fn post(&self, body: &str) -> Delivery {
        let (license_key, url) = self.current_route();
        let request = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("X-License-Key", &license_key);
        match request.send_string(body) {
            Ok(response) => classify_status(response.status()),
            Err(ureq::Error::Status(status, _)) => classify_status(status),
            Err(ureq::Error::Transport(err)) => Delivery::Failed {
                reason: err.to_string(),
            },
        }
    }
}

/// Wrap a pre-serialised payload in the batch envelope.
///
/// The payload is spliced in verbatim so malformed input stays the
/// caller's contract violation rather than a parse error here.
fn batch_envelope(payload: &str) -> String {
    format!("[{{\"logs\":{payload}}}]")
}

fn classify_status(status: u16) -> Delivery {
    if (200..=299).contains(&status) {
        Delivery::Accepted { status }
    } else {
        Delivery::Rejected { status }
    }
}

fn tls_connector(verify_tls: bool) -> Result<native_tls::TlsConnector, native_tls::Error> {
    let mut builder = native_tls::TlsConnector::builder();
    if !verify_tls {
        builder.danger_accept_invalid_certs(true);
        builder.danger_accept_invalid_hostnames(true);
    }
    builder.build()
}
