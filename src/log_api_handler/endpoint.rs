//! Ingest host derivation from a license key.
//!
//! Region-scoped license keys carry a short prefix such as `eu01x` or
//! `gov02x`: two or three lowercase letters naming the region, two digits,
//! then the literal `x`. Keys carrying such a prefix route to the regional
//! ingest host; every other key routes to the default (US) host.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ingest host used when the license key carries no region prefix.
pub const DEFAULT_INGEST_HOST: &str = "log-api.newrelic.com";

static REGION_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]{2,3})[0-9]{2}x").expect("region prefix pattern compiles"));

/// Extract the region code from a license key, if the key carries one.
pub fn region_of(license_key: &str) -> Option<&str> {
    REGION_PREFIX
        .captures(license_key)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Derive the fully-qualified ingest host for a license key.
///
/// Pure and total: any string input maps to a host, with unmatched keys
/// (including the empty string) falling back to [`DEFAULT_INGEST_HOST`].
pub fn resolve_default_host(license_key: &str) -> String {
    match region_of(license_key) {
        Some(region) => format!("log-api.{region}.newrelic.com"),
        None => DEFAULT_INGEST_HOST.to_owned(),
    }
}
