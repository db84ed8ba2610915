//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → cloned into the server state at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::CacheConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::OfflineConfig;
pub use schema::ProxyConfig;
pub use schema::TimeoutConfig;
pub use schema::UpstreamConfig;
pub use validation::{validate_config, ValidationError};
