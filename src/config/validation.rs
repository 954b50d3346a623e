//! Configuration validation.
//!
//! # Responsibilities
//! - Refuse to start without a usable upstream base address
//! - Check the optional deadlines are meaningful
//! - Produce the immutable [`ForwarderContext`] used at runtime
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - The upstream address is only checked for blankness; malformed URLs
//!   surface per request as gateway failures
//! - Runs exactly once, before the listener is bound

use thiserror::Error;

use crate::config::context::{ForwarderContext, UpstreamBase};
use crate::config::schema::ForwarderConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `forwarder.target_host` is missing or whitespace only.
    #[error("missing required configuration: forwarder.target_host")]
    BlankTargetHost,

    /// A configured timeout is zero.
    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate the loaded configuration and build the runtime context.
pub fn validate_config(config: &ForwarderConfig) -> Result<ForwarderContext, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let target_host = &config.forwarder.target_host;
    if target_host.trim().is_empty() {
        errors.push(ValidationError::BlankTargetHost);
    }

    if config.timeouts.connect_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ForwarderContext::new(
        UpstreamBase::new_unchecked(target_host.clone()),
        config.access_logging.enabled,
        config.timeouts,
        config.limits,
    ))
}
