//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read file, toml → ServerConfig)
//!     → validation.rs (addresses, limits, log filter)
//!     → ServerConfig (validated, immutable)
//!     → HttpServer, logging, Application options
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - Every section has defaults, so an empty file is a valid config
//! - Serde rejects malformed input; validation reports every semantic error at once

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ServerConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
