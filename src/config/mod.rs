//! Application configuration.
//!
//! Loaded once at startup from `config.toml` in the platform config
//! directory; every section has defaults so an absent file is valid.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, LoggingConfig, PersistenceConfig, SearchConfig, TimingConfig};
