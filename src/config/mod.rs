//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (EDGE_* environment overrides, applied once)
//!     → validation.rs (semantic checks)
//!     → EdgeConfig (validated, immutable)
//!     → threaded to the components that need it
//! ```
//!
//! # Design Decisions
//! - Config is read once at process start; nothing reads the environment later
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, resolve_config, ConfigError};
pub use schema::{
    BridgeConfig, EdgeConfig, InvokeMode, ListenerConfig, ObservabilityConfig, ProbeConfig,
    RoutesConfig,
};
pub use validation::{validate_config, ValidationError};
