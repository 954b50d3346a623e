//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (optional connect/request deadline)
//!     → exactly one attempt, no retries
//! ```
//!
//! # Design Decisions
//! - Deadlines are opt-in through configuration
//! - Every request maps to at most one upstream attempt

pub mod timeouts;
