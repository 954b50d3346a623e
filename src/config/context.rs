//! Validated, immutable runtime context.
//!
//! Built once by [`validate_config`](crate::config::validation::validate_config)
//! and handed to the HTTP layer. Nothing in here changes after startup.

use std::fmt;
use std::time::Duration;

use crate::config::schema::{LimitsConfig, TimeoutConfig};

/// Upstream base address that passed the startup check.
///
/// Only non-blankness is guaranteed. The value is kept verbatim (no
/// trimming, no URL parsing) because the target URL is built by plain
/// concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamBase(String);

impl UpstreamBase {
    pub(crate) fn new_unchecked(base: String) -> Self {
        Self(base)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UpstreamBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only context shared by every request.
#[derive(Debug, Clone)]
pub struct ForwarderContext {
    upstream: UpstreamBase,
    access_log_enabled: bool,
    timeouts: TimeoutConfig,
    limits: LimitsConfig,
}

impl ForwarderContext {
    pub(crate) fn new(
        upstream: UpstreamBase,
        access_log_enabled: bool,
        timeouts: TimeoutConfig,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            upstream,
            access_log_enabled,
            timeouts,
            limits,
        }
    }

    pub fn upstream(&self) -> &UpstreamBase {
        &self.upstream
    }

    pub fn access_log_enabled(&self) -> bool {
        self.access_log_enabled
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.timeouts.connect_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeouts.request_secs.map(Duration::from_secs)
    }

    /// Inbound body limit in bytes; `usize::MAX` when unlimited.
    pub fn max_body_bytes(&self) -> usize {
        self.limits.max_body_bytes.unwrap_or(usize::MAX)
    }
}
