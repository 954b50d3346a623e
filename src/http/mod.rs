//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route, body limit)
//!     → client_ip.rs (X-Forwarded-For / peer / "unknown")
//!     → [access log record, if enabled]
//!     → request.rs (target URL, headers + X-Original-IP, body)
//!     → dispatch.rs (one upstream call, body drained)
//!     → bare status code to the caller
//! ```

pub mod client_ip;
pub mod dispatch;
pub mod request;
pub mod server;

pub use client_ip::{resolve_client_ip, PeerAddr, UNKNOWN_CLIENT, X_FORWARDED_FOR};
pub use dispatch::{Dispatcher, ForwardError, ForwardOutcome, GATEWAY_FAILURE};
pub use request::{IncomingRequest, OutboundRequest, X_ORIGINAL_IP};
pub use server::HttpServer;
