//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build server → Bind listener
//!
//! Shutdown (shutdown.rs + signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: a configuration error aborts before the listener is bound
//! - In-flight requests finish before the process exits

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
