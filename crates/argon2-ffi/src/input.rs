//! Password and salt normalization
//!
//! Callers hand over text or raw bytes; the native function only takes bytes.
//! [`Input`] makes the distinction explicit and [`normalize`] produces the
//! exact byte sequence passed across the boundary.

use crate::error::{Argon2Error, Argon2Result};
use std::ffi::{OsStr, OsString};
use zeroize::Zeroizing;

/// Password or salt as supplied by the caller
#[derive(Clone, PartialEq, Eq)]
pub enum Input {
    /// Text, encoded as UTF-8
    Text(String),
    /// Bytes, passed through unchanged
    Raw(Vec<u8>),
    /// Platform string (e.g. from argv or the environment); must be valid Unicode
    Os(OsString),
}

// Inputs usually hold secrets; keep them out of logs.
impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(s) => write!(f, "Text(<{} bytes>)", s.len()),
            Input::Raw(b) => write!(f, "Raw(<{} bytes>)", b.len()),
            Input::Os(s) => write!(f, "Os(<{} bytes>)", s.len()),
        }
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Text(value.to_string())
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Text(value)
    }
}

impl From<&String> for Input {
    fn from(value: &String) -> Self {
        Input::Text(value.clone())
    }
}

impl From<&[u8]> for Input {
    fn from(value: &[u8]) -> Self {
        Input::Raw(value.to_vec())
    }
}

impl From<Vec<u8>> for Input {
    fn from(value: Vec<u8>) -> Self {
        Input::Raw(value)
    }
}

impl<const N: usize> From<[u8; N]> for Input {
    fn from(value: [u8; N]) -> Self {
        Input::Raw(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Input {
    fn from(value: &[u8; N]) -> Self {
        Input::Raw(value.to_vec())
    }
}

impl From<&OsStr> for Input {
    fn from(value: &OsStr) -> Self {
        Input::Os(value.to_os_string())
    }
}

impl From<OsString> for Input {
    fn from(value: OsString) -> Self {
        Input::Os(value)
    }
}

/// Convert an input into the bytes handed to native code
///
/// `field` names the argument in the error ("password" or "salt"). The
/// returned buffer is wiped when dropped.
pub fn normalize(input: Input, field: &'static str) -> Argon2Result<Zeroizing<Vec<u8>>> {
    match input {
        Input::Raw(bytes) => Ok(Zeroizing::new(bytes)),
        Input::Text(text) => Ok(Zeroizing::new(text.into_bytes())),
        Input::Os(os) => match os.into_string() {
            Ok(text) => Ok(Zeroizing::new(text.into_bytes())),
            Err(rejected) => {
                drop(wiped_os_bytes(rejected));
                Err(Argon2Error::InvalidEncoding {
                    field,
                    reason: "platform string is not valid Unicode".to_string(),
                })
            }
        },
    }
}

/// Take ownership of a rejected platform string so it is wiped on drop
fn wiped_os_bytes(os: OsString) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(os.into_encoded_bytes())
}
