//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → access_log.rs (one record per forwarded request, optional)
//!
//! Consumers:
//!     → stdout through the tracing-subscriber fmt layer
//! ```
//!
//! # Design Decisions
//! - Access records use their own target (`forwarder::access`)
//! - A disabled access log costs nothing per request

pub mod access_log;
pub mod logging;

pub use access_log::{AccessLog, AccessRecord, ACCESS_LOG_TARGET};
