//! Argon2 binding configuration
//!
//! Provides configuration management for the native Argon2 binding:
//! - Binding configuration file (argon2.toml)
//! - User configuration (~/.argon2/config.toml)
//! - Environment variable overrides
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. User config (~/.argon2/config.toml)
//! 3. Project config (./argon2.toml, searched upwards)
//! 4. Environment variables (ARGON2_*)
//!
//! # Example
//!
//! ```no_run
//! use argon2_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("library dir: {:?}", config.library_dir());
//! ```

pub mod binding;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use binding::{BindingConfig, DefaultsConfig, LibraryConfig, LimitsConfig};
pub use loader::{Config, ConfigLoader, ENV_LIB_DIR, ENV_MAX_OUTPUT_LEN, ENV_VARIANT};
