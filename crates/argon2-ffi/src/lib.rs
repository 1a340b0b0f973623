//! Argon2 native binding
//!
//! Computes Argon2 password hashes by calling the `argon2_hash` entry point
//! of a native libargon2 that is located and loaded at runtime:
//! - Library resolution per platform (`ARGON2_LIB_DIR`, then a fallback dir)
//! - Text and byte inputs normalized to the exact bytes hashed
//! - Parameters validated before any native call
//! - Native status codes translated into typed errors
//!
//! # Example
//!
//! ```no_run
//! use argon2_ffi::{hash, HashOptions, Variant};
//!
//! let options = HashOptions::default().with_variant(Variant::Argon2id);
//! let result = hash("password", "some salt", &options)?;
//! assert_eq!(result.len(), 128);
//! # Ok::<(), argon2_ffi::Argon2Error>(())
//! ```

/// Binding version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod buffer;
pub mod caller;
pub mod encoded;
pub mod error;
pub mod hasher;
pub mod input;
pub mod loader;
pub mod params;
pub mod platform;
pub mod types;

pub use caller::{Argon2HashFn, ENTRY_SYMBOL};
pub use encoded::EncodedHash;
pub use error::{translate, Argon2Error, Argon2Result, ErrorCode, ErrorKind};
pub use hasher::{hash, hash_encoded, verify_encoded, Argon2};
pub use input::{normalize, Input};
pub use loader::{install_shared_handle, shared_handle, HandleCell, LibraryResolver, NativeHandle};
pub use params::{Limits, DEFAULT_MAX_OUTPUT_LEN, MIN_OUTPUT_LEN};
pub use platform::Platform;
pub use types::{HashOptions, HashRequest, HashResult, Variant};
