//! Configuration for Halo.
//!
//! Values are layered: a `.env` file is loaded into the process environment
//! first, then an optional TOML file supplies the base values and individual
//! environment variables override them. Anything left unset falls back to the
//! defaults in [`constants`]. The result is checked by
//! [`validation::apply_guard_rails`], which rejects unusable settings and
//! collects non-fatal warnings for the caller to log.

#![allow(missing_docs)]

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    Config, ConfigMetadata, ProbeConfig, RetryConfig, ServerConfig,
    SourceConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
