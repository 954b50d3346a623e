//! Access log records.
//!
//! One record per forwarded request, written before the upstream call under
//! the [`ACCESS_LOG_TARGET`] target so it can be filtered independently of
//! the rest of the crate's logs.

use axum::http::Method;

/// `tracing` target used for access log records.
pub const ACCESS_LOG_TARGET: &str = "forwarder::access";

/// Fields of one access log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    pub method: Method,
    /// Raw path plus query, as received.
    pub uri: String,
    pub body_bytes: usize,
    pub client_ip: String,
}

impl AccessRecord {
    fn emit(&self) {
        tracing::info!(
            target: ACCESS_LOG_TARGET,
            method = %self.method,
            uri = %self.uri,
            body_bytes = self.body_bytes,
            client_ip = %self.client_ip,
            "{} {}, Content {} bytes, from {}",
            self.method,
            self.uri,
            self.body_bytes,
            self.client_ip,
        );
    }
}

/// Access log switch, fixed at startup.
#[derive(Debug, Clone, Copy)]
pub struct AccessLog {
    enabled: bool,
}

impl AccessLog {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Emit a record built by `build`. When disabled `build` is never called.
    ///
    /// Returns whether a record was written.
    pub fn record<F>(&self, build: F) -> bool
    where
        F: FnOnce() -> AccessRecord,
    {
        if !self.enabled {
            return false;
        }
        build().emit();
        true
    }
}
