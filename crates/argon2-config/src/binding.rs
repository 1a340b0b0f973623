//! Binding Configuration (argon2.toml)
//!
//! Describes where the native library lives, how large an output the binding
//! is willing to allocate, and the default hashing options.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Variant names accepted in `defaults.variant` and `ARGON2_VARIANT`
pub const VARIANT_NAMES: [&str; 3] = ["argon2d", "argon2i", "argon2id"];

/// Smallest output length the native library produces correctly
pub const MIN_OUTPUT_LEN: usize = 4;

/// Binding configuration from argon2.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    /// Native library location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<LibraryConfig>,

    /// Allocation limits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<LimitsConfig>,

    /// Default hashing options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Native library location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Directory searched first (ARGON2_LIB_DIR overrides it)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Directory searched when `dir` is unset or does not hold the library
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_dir: Option<PathBuf>,
}

/// Allocation limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest raw hash the binding will allocate, in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_len: Option<usize>,
}

/// Default hashing options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_cost: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_len: Option<usize>,

    /// One of "argon2d", "argon2i", "argon2id"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl BindingConfig {
    /// Load binding configuration from a file
    ///
    /// Relative library directories are resolved against the directory
    /// holding the file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let mut config = Self::parse(&content, path)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_paths(base);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text; `origin` is only used for error reporting
    pub fn parse(content: &str, origin: &Path) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: origin.to_path_buf(),
            error: e,
        })
    }

    /// Validate the binding configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(limits) = &self.limits {
            if let Some(max) = limits.max_output_len {
                validate_max_output_len("limits.max_output_len", max)?;
            }
        }

        if let Some(defaults) = &self.defaults {
            validate_cost("defaults.time_cost", defaults.time_cost)?;
            validate_cost("defaults.memory_cost", defaults.memory_cost)?;
            validate_cost("defaults.parallelism", defaults.parallelism)?;

            if let Some(len) = defaults.output_len {
                if len < MIN_OUTPUT_LEN {
                    return Err(ConfigError::InvalidValue {
                        field: "defaults.output_len".to_string(),
                        reason: format!("must be at least {}, got {}", MIN_OUTPUT_LEN, len),
                    });
                }
                if let Some(max) = self.max_output_len() {
                    if len > max {
                        return Err(ConfigError::InvalidValue {
                            field: "defaults.output_len".to_string(),
                            reason: format!("exceeds limits.max_output_len ({})", max),
                        });
                    }
                }
            }

            if let Some(variant) = &defaults.variant {
                validate_variant_name("defaults.variant", variant)?;
            }
        }

        Ok(())
    }

    /// Get the user config file path (~/.argon2/config.toml)
    pub fn user_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".argon2").join("config.toml"))
    }

    pub fn library_dir(&self) -> Option<&Path> {
        self.library.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn fallback_dir(&self) -> Option<&Path> {
        self.library.as_ref().and_then(|l| l.fallback_dir.as_deref())
    }

    pub fn max_output_len(&self) -> Option<usize> {
        self.limits.as_ref().and_then(|l| l.max_output_len)
    }

    pub fn default_variant(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.variant.as_deref())
    }

    /// Merge another binding config into this one
    /// Other config takes precedence for non-None values
    pub fn merge(&mut self, other: &BindingConfig) {
        if let Some(library) = &other.library {
            let mine = self.library.get_or_insert_with(Default::default);
            merge_option(&mut mine.dir, &library.dir);
            merge_option(&mut mine.fallback_dir, &library.fallback_dir);
        }
        if let Some(limits) = &other.limits {
            let mine = self.limits.get_or_insert_with(Default::default);
            merge_option(&mut mine.max_output_len, &limits.max_output_len);
        }
        if let Some(defaults) = &other.defaults {
            let mine = self.defaults.get_or_insert_with(Default::default);
            merge_option(&mut mine.time_cost, &defaults.time_cost);
            merge_option(&mut mine.memory_cost, &defaults.memory_cost);
            merge_option(&mut mine.parallelism, &defaults.parallelism);
            merge_option(&mut mine.output_len, &defaults.output_len);
            merge_option(&mut mine.variant, &defaults.variant);
        }
    }

    fn resolve_relative_paths(&mut self, base: &Path) {
        if let Some(library) = self.library.as_mut() {
            for dir in [&mut library.dir, &mut library.fallback_dir]
                .into_iter()
                .flatten()
            {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
    }
}

fn merge_option<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if source.is_some() {
        *target = source.clone();
    }
}

fn validate_cost(field: &str, value: Option<u32>) -> ConfigResult<()> {
    if value == Some(0) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Validate an output length ceiling
pub(crate) fn validate_max_output_len(field: &str, max: usize) -> ConfigResult<()> {
    if max < MIN_OUTPUT_LEN || max as u64 > u32::MAX as u64 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!(
                "must be between {} and {}, got {}",
                MIN_OUTPUT_LEN,
                u32::MAX,
                max
            ),
        });
    }
    Ok(())
}

/// Validate a variant name
pub(crate) fn validate_variant_name(field: &str, value: &str) -> ConfigResult<()> {
    if !VARIANT_NAMES.contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!(
                "must be 'argon2d', 'argon2i', or 'argon2id', got '{}'",
                value
            ),
        });
    }
    Ok(())
}
