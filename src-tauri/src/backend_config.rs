use std::{env, time::Duration};

use url::Host;

use crate::{
    DEFAULT_BACKEND_HOST, DEFAULT_BACKEND_PORT, DEFAULT_CLEANUP_TIMEOUT, DEFAULT_INITIAL_DELAY,
    DEFAULT_MAX_RETRIES, DEFAULT_POLL_INTERVAL, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_SHUTDOWN_REQUEST_TIMEOUT, HEALTH_CHECK_PATH, SHUTDOWN_PATH,
};

const HOST_ENV: &str = "SONDACLICK_BACKEND_HOST";
const PORT_ENV: &str = "SONDACLICK_BACKEND_PORT";
const INITIAL_DELAY_ENV: &str = "SONDACLICK_BACKEND_INITIAL_DELAY_MS";
const POLL_INTERVAL_ENV: &str = "SONDACLICK_BACKEND_POLL_INTERVAL_MS";
const MAX_RETRIES_ENV: &str = "SONDACLICK_BACKEND_MAX_RETRIES";
const PROBE_TIMEOUT_ENV: &str = "SONDACLICK_BACKEND_PROBE_TIMEOUT_MS";
const SHUTDOWN_REQUEST_TIMEOUT_ENV: &str = "SONDACLICK_SHUTDOWN_REQUEST_TIMEOUT_MS";
const CLEANUP_TIMEOUT_ENV: &str = "SONDACLICK_CLEANUP_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BackendTimings {
    pub(crate) initial_delay: Duration,
    pub(crate) poll_interval: Duration,
    pub(crate) max_retries: u32,
    pub(crate) probe_timeout: Duration,
    pub(crate) shutdown_request_timeout: Duration,
    pub(crate) cleanup_timeout: Duration,
}

impl Default for BackendTimings {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            shutdown_request_timeout: DEFAULT_SHUTDOWN_REQUEST_TIMEOUT,
            cleanup_timeout: DEFAULT_CLEANUP_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BackendEndpoint {
    pub(crate) host: String,
    pub(crate) port: u16,
}

impl Default for BackendEndpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_BACKEND_HOST.to_string(),
            port: DEFAULT_BACKEND_PORT,
        }
    }
}

impl BackendEndpoint {
    pub(crate) fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub(crate) fn health_url(&self) -> String {
        format!("{}{}", self.base_url(), HEALTH_CHECK_PATH)
    }

    pub(crate) fn shutdown_url(&self) -> String {
        format!("{}{}", self.base_url(), SHUTDOWN_PATH)
    }
}

pub(crate) fn endpoint_from_env() -> BackendEndpoint {
    let defaults = BackendEndpoint::default();
    let host = env::var(HOST_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| {
            let valid = is_valid_host(value);
            if !valid && !value.is_empty() {
                tracing::warn!("ignoring invalid value {value:?} for {HOST_ENV}; using default");
            }
            valid
        })
        .unwrap_or(defaults.host);
    let port = parse_positive(PORT_ENV, env::var(PORT_ENV).ok().as_deref())
        .and_then(|value| u16::try_from(value).ok())
        .unwrap_or(defaults.port);
    BackendEndpoint { host, port }
}

pub(crate) fn timings_from_env() -> BackendTimings {
    let defaults = BackendTimings::default();
    let duration = |key: &str, fallback: Duration| {
        parse_positive(key, env::var(key).ok().as_deref())
            .map(Duration::from_millis)
            .unwrap_or(fallback)
    };

    BackendTimings {
        initial_delay: duration(INITIAL_DELAY_ENV, defaults.initial_delay),
        poll_interval: duration(POLL_INTERVAL_ENV, defaults.poll_interval),
        max_retries: parse_positive(MAX_RETRIES_ENV, env::var(MAX_RETRIES_ENV).ok().as_deref())
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(defaults.max_retries),
        probe_timeout: duration(PROBE_TIMEOUT_ENV, defaults.probe_timeout),
        shutdown_request_timeout: duration(
            SHUTDOWN_REQUEST_TIMEOUT_ENV,
            defaults.shutdown_request_timeout,
        ),
        cleanup_timeout: duration(CLEANUP_TIMEOUT_ENV, defaults.cleanup_timeout),
    }
}

/// Parses a strictly positive integer setting. Absent values are silent,
/// invalid ones are logged and ignored.
fn parse_positive(key: &str, raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            tracing::warn!("ignoring invalid value {raw:?} for {key}; using default");
            None
        }
    }
}

/// Accepts a bare host only: a path, port or userinfo would corrupt the
/// URLs built from it.
fn is_valid_host(host: &str) -> bool {
    Host::parse(host).is_ok()
}
