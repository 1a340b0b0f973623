//! Request and result types
//!
//! Type mapping at the native boundary:
//! - `Variant` → `uint32_t` type selector (d = 0, i = 1, id = 2)
//! - `time_cost` / `memory_cost` / `parallelism` → `uint32_t`
//! - `output_len` → `size_t`

use crate::error::{Argon2Error, Argon2Result};
use crate::input::{normalize, Input};
use crate::params::{validate, Limits};
use argon2_config::BindingConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use zeroize::Zeroizing;

/// Argon2 flavour, as numbered by the native `argon2_type` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Data-dependent memory access
    Argon2d,
    /// Data-independent memory access
    #[default]
    Argon2i,
    /// Hybrid: first half-pass data-independent
    Argon2id,
}

impl Variant {
    /// Selector passed as the last native argument
    pub fn code(self) -> u32 {
        match self {
            Variant::Argon2d => 0,
            Variant::Argon2i => 1,
            Variant::Argon2id => 2,
        }
    }

    /// Reverse of [`Variant::code`]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Variant::Argon2d),
            1 => Some(Variant::Argon2i),
            2 => Some(Variant::Argon2id),
            _ => None,
        }
    }

    /// Lowercase name, as used in encoded hashes and configuration
    pub fn name(self) -> &'static str {
        match self {
            Variant::Argon2d => "argon2d",
            Variant::Argon2i => "argon2i",
            Variant::Argon2id => "argon2id",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = Argon2Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "argon2d" => Ok(Variant::Argon2d),
            "argon2i" => Ok(Variant::Argon2i),
            "argon2id" => Ok(Variant::Argon2id),
            other => Err(Argon2Error::InvalidParameter {
                field: "variant",
                reason: format!("unknown variant '{}'", other),
            }),
        }
    }
}

/// Hashing options
///
/// Defaults: `time_cost` 16, `memory_cost` 8, `parallelism` 1,
/// `output_len` 128, `variant` Argon2i.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashOptions {
    /// Iteration count
    pub time_cost: u32,
    /// Memory cost factor
    pub memory_cost: u32,
    /// Lane count
    pub parallelism: u32,
    /// Raw hash length in bytes
    pub output_len: usize,
    pub variant: Variant,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self {
            time_cost: 16,
            memory_cost: 8,
            parallelism: 1,
            output_len: 128,
            variant: Variant::Argon2i,
        }
    }
}

impl HashOptions {
    /// Options with configured defaults applied over the built-in ones
    pub fn from_config(config: &BindingConfig) -> Argon2Result<Self> {
        let mut options = Self::default();
        if let Some(defaults) = &config.defaults {
            if let Some(t) = defaults.time_cost {
                options.time_cost = t;
            }
            if let Some(m) = defaults.memory_cost {
                options.memory_cost = m;
            }
            if let Some(p) = defaults.parallelism {
                options.parallelism = p;
            }
            if let Some(len) = defaults.output_len {
                options.output_len = len;
            }
            if let Some(name) = &defaults.variant {
                options.variant = name.parse()?;
            }
        }
        Ok(options)
    }

    pub fn with_time_cost(mut self, time_cost: u32) -> Self {
        self.time_cost = time_cost;
        self
    }

    pub fn with_memory_cost(mut self, memory_cost: u32) -> Self {
        self.memory_cost = memory_cost;
        self
    }

    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_output_len(mut self, output_len: usize) -> Self {
        self.output_len = output_len;
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }
}

/// A fully normalized hashing request
///
/// Password bytes are wiped when the request is dropped.
pub struct HashRequest {
    pub(crate) password: Zeroizing<Vec<u8>>,
    pub(crate) salt: Zeroizing<Vec<u8>>,
    pub(crate) options: HashOptions,
}

impl HashRequest {
    /// Normalize password and salt into a request
    pub fn new(
        password: impl Into<Input>,
        salt: impl Into<Input>,
        options: HashOptions,
    ) -> Argon2Result<Self> {
        Ok(Self {
            password: normalize(password.into(), "password")?,
            salt: normalize(salt.into(), "salt")?,
            options,
        })
    }

    /// Check the request's cost parameters against `limits`
    pub fn validate(&self, limits: &Limits) -> Argon2Result<()> {
        validate(
            self.options.time_cost,
            self.options.memory_cost,
            self.options.parallelism,
            self.options.output_len,
            limits,
        )
    }

    pub fn password(&self) -> &[u8] {
        &self.password
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn options(&self) -> &HashOptions {
        &self.options
    }
}

impl std::fmt::Debug for HashRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRequest")
            .field("password_len", &self.password.len())
            .field("salt_len", &self.salt.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Output of a successful hash
///
/// Owns its bytes outright; nothing aliases the buffers used during the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashResult {
    raw: Vec<u8>,
    encoded: Option<String>,
}

impl HashResult {
    pub(crate) fn new(raw: Vec<u8>, encoded: Option<String>) -> Self {
        Self { raw, encoded }
    }

    /// Raw hash bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Encoded hash string, when one was requested
    pub fn encoded(&self) -> Option<&str> {
        self.encoded.as_deref()
    }

    /// Lowercase hex rendering of the raw hash
    pub fn to_hex(&self) -> String {
        use std::fmt::Write;

        self.raw.iter().fold(String::with_capacity(self.raw.len() * 2), |mut out, b| {
            let _ = write!(out, "{:02x}", b);
            out
        })
    }
}

impl AsRef<[u8]> for HashResult {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2_config::DefaultsConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variant_codes() {
        assert_eq!(Variant::Argon2d.code(), 0);
        assert_eq!(Variant::Argon2i.code(), 1);
        assert_eq!(Variant::Argon2id.code(), 2);
        assert_eq!(Variant::from_code(3), None);
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("argon2id".parse::<Variant>().unwrap(), Variant::Argon2id);
        assert_eq!("Argon2D".parse::<Variant>().unwrap(), Variant::Argon2d);
        assert!("argon2ds".parse::<Variant>().is_err());
    }

    #[test]
    fn test_default_options() {
        let options = HashOptions::default();
        assert_eq!(options.time_cost, 16);
        assert_eq!(options.memory_cost, 8);
        assert_eq!(options.parallelism, 1);
        assert_eq!(options.output_len, 128);
        assert_eq!(options.variant, Variant::Argon2i);
    }

    #[test]
    fn test_options_from_config() {
        let config = BindingConfig {
            defaults: Some(DefaultsConfig {
                time_cost: Some(3),
                variant: Some("argon2id".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let options = HashOptions::from_config(&config).unwrap();
        assert_eq!(options.time_cost, 3);
        assert_eq!(options.memory_cost, 8);
        assert_eq!(options.variant, Variant::Argon2id);
    }

    #[test]
    fn test_options_serde_partial() {
        let options: HashOptions =
            serde_json::from_str(r#"{"output_len": 32, "variant": "argon2d"}"#).unwrap();
        assert_eq!(options.output_len, 32);
        assert_eq!(options.variant, Variant::Argon2d);
        assert_eq!(options.time_cost, 16);
    }

    #[test]
    fn test_request_debug_hides_password() {
        let request = HashRequest::new("secret", "some salt", HashOptions::default()).unwrap();
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("password_len: 6"));
    }

    #[test]
    fn test_result_hex() {
        let result = HashResult::new(vec![0x00, 0xab, 0x10], None);
        assert_eq!(result.to_hex(), "00ab10");
        assert_eq!(result.len(), 3);
        assert_eq!(result.encoded(), None);
    }
}
