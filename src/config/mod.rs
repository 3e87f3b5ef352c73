//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file (--config)
//!     → loader.rs (read & deserialize, every field defaulted)
//!     → validation.rs (semantic checks, all errors collected)
//!     → --port / PORT override
//!     → ProxyConfig (immutable for the life of the process)
//! ```
//!
//! # Design Decisions
//! - Running without a file is the normal case; defaults are a working proxy
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, RewriteConfig, TimeoutConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
