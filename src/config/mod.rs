//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional) + CLI/env overrides
//!     → loader.rs (parse, deserialize, apply overrides)
//!     → validation.rs (startup gate)
//!     → ForwarderContext (validated, immutable)
//!     → shared via Arc with the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod context;
pub mod loader;
pub mod schema;
pub mod validation;

pub use context::{ForwarderContext, UpstreamBase};
pub use loader::{build_context, load_config, ConfigError, ConfigOverrides};
pub use schema::ForwarderConfig;
