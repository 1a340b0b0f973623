//! Configuration Loader
//!
//! Handles loading configuration from multiple sources with proper precedence.

use crate::binding::{validate_max_output_len, validate_variant_name, BindingConfig};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Directory holding the native library; overrides `library.dir`
pub const ENV_LIB_DIR: &str = "ARGON2_LIB_DIR";

/// Output allocation ceiling; overrides `limits.max_output_len`
pub const ENV_MAX_OUTPUT_LEN: &str = "ARGON2_MAX_OUTPUT_LEN";

/// Default variant; overrides `defaults.variant`
pub const ENV_VARIANT: &str = "ARGON2_VARIANT";

/// File name searched for when walking up from a directory
pub const CONFIG_FILE_NAME: &str = "argon2.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. User config (~/.argon2/config.toml) - lowest priority
/// 2. Project config (./argon2.toml) - overrides user config
/// 3. Environment variables (ARGON2_*) - overrides both
pub struct ConfigLoader {
    /// Cached user config path
    user_config_path: Option<PathBuf>,
}

/// Loaded configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective binding configuration after all overrides
    pub binding: BindingConfig,

    /// File the project configuration was read from, if any
    pub source: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            user_config_path: None,
        }
    }

    /// Create a loader that reads user configuration from a specific path
    pub fn with_user_config(path: PathBuf) -> Self {
        Self {
            user_config_path: Some(path),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find argon2.toml, merges it over the
    /// user config if one exists, then applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let mut binding = self.load_user_config()?;

        let source = match find_config_file(start_dir) {
            Some(path) => {
                binding.merge(&BindingConfig::load_from_file(&path)?);
                Some(path)
            }
            None => None,
        };

        let binding = apply_env_overrides(binding)?;
        Ok(Config { binding, source })
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let mut binding = self.load_user_config()?;
        binding.merge(&BindingConfig::load_from_file(config_path)?);

        let binding = apply_env_overrides(binding)?;
        Ok(Config {
            binding,
            source: Some(config_path.to_path_buf()),
        })
    }

    /// Load built-in defaults plus environment overrides, ignoring files
    pub fn load_from_env(&self) -> ConfigResult<Config> {
        let binding = apply_env_overrides(BindingConfig::default())?;
        Ok(Config {
            binding,
            source: None,
        })
    }

    /// Load user configuration from ~/.argon2/config.toml
    fn load_user_config(&mut self) -> ConfigResult<BindingConfig> {
        if self.user_config_path.is_none() {
            match BindingConfig::user_config_path() {
                Ok(path) => self.user_config_path = Some(path),
                // No home directory means no user config
                Err(ConfigError::HomeNotFound) => return Ok(BindingConfig::default()),
                Err(e) => return Err(e),
            }
        }

        match &self.user_config_path {
            Some(path) if path.exists() => BindingConfig::load_from_file(path),
            _ => Ok(BindingConfig::default()),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Directory searched first for the native library
    pub fn library_dir(&self) -> Option<&Path> {
        self.binding.library_dir()
    }

    /// Fallback directory for the native library
    pub fn fallback_dir(&self) -> Option<&Path> {
        self.binding.fallback_dir()
    }

    /// Largest output the binding may allocate
    pub fn max_output_len(&self) -> Option<usize> {
        self.binding.max_output_len()
    }

    /// Configured default variant name
    pub fn default_variant(&self) -> Option<&str> {
        self.binding.default_variant()
    }

    /// Check if a project file contributed to this config
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }
}

/// Find argon2.toml by walking up the directory tree
fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Apply environment variable overrides to a binding config
///
/// Empty variables are treated as unset.
fn apply_env_overrides(mut config: BindingConfig) -> ConfigResult<BindingConfig> {
    if let Some(dir) = non_empty_var(ENV_LIB_DIR) {
        config.library.get_or_insert_with(Default::default).dir = Some(PathBuf::from(dir));
    }

    if let Some(raw) = non_empty_var(ENV_MAX_OUTPUT_LEN) {
        let max: usize = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: ENV_MAX_OUTPUT_LEN.to_string(),
            reason: format!("'{}' is not a byte count", raw),
        })?;
        validate_max_output_len(ENV_MAX_OUTPUT_LEN, max)?;
        config.limits.get_or_insert_with(Default::default).max_output_len = Some(max);
    }

    if let Some(variant) = non_empty_var(ENV_VARIANT) {
        let variant = variant.to_lowercase();
        validate_variant_name(ENV_VARIANT, &variant)?;
        config.defaults.get_or_insert_with(Default::default).variant = Some(variant);
    }

    config.validate()?;
    Ok(config)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, content).unwrap();
        config_path
    }

    fn isolated_loader(temp_dir: &TempDir) -> ConfigLoader {
        ConfigLoader::with_user_config(temp_dir.path().join("no-user-config.toml"))
    }

    #[test]
    #[serial]
    fn test_load_project_config() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[library]
dir = "/opt/argon2"
"#,
        );

        let mut loader = isolated_loader(&temp_dir);
        let config = loader.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(config.library_dir(), Some(Path::new("/opt/argon2")));
        assert!(config.has_source());
    }

    #[test]
    #[serial]
    fn test_find_config_in_parent() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[defaults]
variant = "argon2d"
"#,
        );

        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let mut loader = isolated_loader(&temp_dir);
        let config = loader.load_from_directory(&sub_dir).unwrap();

        assert_eq!(config.default_variant(), Some("argon2d"));
        assert_eq!(
            config.source.as_deref(),
            Some(temp_dir.path().join(CONFIG_FILE_NAME).as_path())
        );
    }

    #[test]
    #[serial]
    fn test_no_project_config() {
        let temp_dir = TempDir::new().unwrap();

        let mut loader = isolated_loader(&temp_dir);
        let config = loader.load_from_directory(temp_dir.path()).unwrap();

        assert!(!config.has_source());
        assert_eq!(config.library_dir(), None);
    }

    #[test]
    #[serial]
    fn test_env_override_lib_dir() {
        let temp_dir = TempDir::new().unwrap();
        create_config_file(
            temp_dir.path(),
            r#"
[library]
dir = "/from/file"
"#,
        );

        env::set_var(ENV_LIB_DIR, "/from/env");

        let mut loader = isolated_loader(&temp_dir);
        let config = loader.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(config.library_dir(), Some(Path::new("/from/env")));

        env::remove_var(ENV_LIB_DIR);
    }

    #[test]
    #[serial]
    fn test_env_override_invalid_max_output_len() {
        env::set_var(ENV_MAX_OUTPUT_LEN, "lots");

        let loader = ConfigLoader::new();
        let result = loader.load_from_env();

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

        env::remove_var(ENV_MAX_OUTPUT_LEN);
    }

    #[test]
    #[serial]
    fn test_env_override_variant_case_insensitive() {
        env::set_var(ENV_VARIANT, "Argon2ID");

        let loader = ConfigLoader::new();
        let config = loader.load_from_env().unwrap();

        assert_eq!(config.default_variant(), Some("argon2id"));

        env::remove_var(ENV_VARIANT);
    }
}
