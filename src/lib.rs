//! Single-upstream HTTP forwarder library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{ForwarderConfig, ForwarderContext};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
