//! Cost parameter validation
//!
//! Values the native library would reject (or abort on) are caught here with
//! a structured [`Argon2Error::InvalidParameter`], before any native call.

use crate::error::{Argon2Error, Argon2Result};

/// Smallest raw hash length accepted
pub const MIN_OUTPUT_LEN: usize = 4;

/// Default ceiling on the raw hash allocation (1 MiB)
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 1 << 20;

/// Allocation limits applied before calling native code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_output_len: usize,
}

impl Limits {
    /// Create limits with a custom output ceiling
    ///
    /// The ceiling must leave room for the minimum output and fit the native
    /// 32-bit output length.
    pub fn new(max_output_len: usize) -> Argon2Result<Self> {
        if max_output_len < MIN_OUTPUT_LEN || max_output_len as u64 > u32::MAX as u64 {
            return Err(Argon2Error::InvalidParameter {
                field: "max_output_len",
                reason: format!(
                    "must be between {} and {}, got {}",
                    MIN_OUTPUT_LEN,
                    u32::MAX,
                    max_output_len
                ),
            });
        }
        Ok(Self { max_output_len })
    }

    pub fn max_output_len(&self) -> usize {
        self.max_output_len
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
        }
    }
}

/// Check cost parameters and output length
///
/// Each check is independent; the first failing one is reported.
pub fn validate(
    time_cost: u32,
    memory_cost: u32,
    parallelism: u32,
    output_len: usize,
    limits: &Limits,
) -> Argon2Result<()> {
    check_at_least_one("time_cost", time_cost)?;
    check_at_least_one("memory_cost", memory_cost)?;
    check_at_least_one("parallelism", parallelism)?;

    if output_len < MIN_OUTPUT_LEN {
        return Err(Argon2Error::InvalidParameter {
            field: "output_len",
            reason: format!("must be at least {} bytes, got {}", MIN_OUTPUT_LEN, output_len),
        });
    }
    if output_len > limits.max_output_len {
        return Err(Argon2Error::InvalidParameter {
            field: "output_len",
            reason: format!(
                "must be at most {} bytes, got {}",
                limits.max_output_len, output_len
            ),
        });
    }

    Ok(())
}

fn check_at_least_one(field: &'static str, value: u32) -> Argon2Result<()> {
    if value == 0 {
        return Err(Argon2Error::InvalidParameter {
            field,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}
