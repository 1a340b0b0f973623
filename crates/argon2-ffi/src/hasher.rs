//! Public hashing API
//!
//! Each call runs one pipeline: normalize inputs, validate parameters,
//! allocate buffers, call native code, translate the status, hand back owned
//! bytes. No state survives between calls except the shared native handle.

use crate::caller::invoke;
use crate::encoded::EncodedHash;
use crate::error::{translate, Argon2Error, Argon2Result};
use crate::input::Input;
use crate::loader::{shared_handle, LibraryResolver, NativeHandle};
use crate::params::Limits;
use crate::types::{HashOptions, HashRequest, HashResult};
use argon2_config::BindingConfig;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Hasher bound to one native library
///
/// Cheap to clone and safe to share between threads; concurrent calls do not
/// interfere with each other.
#[derive(Debug, Clone)]
pub struct Argon2 {
    handle: Arc<NativeHandle>,
    limits: Limits,
    defaults: HashOptions,
    encoded_version: Option<u32>,
}

impl Argon2 {
    pub fn new(handle: Arc<NativeHandle>) -> Self {
        Self {
            handle,
            limits: Limits::default(),
            defaults: HashOptions::default(),
            encoded_version: None,
        }
    }

    /// Hasher on the process-wide handle
    pub fn shared() -> Argon2Result<Self> {
        Ok(Self::new(shared_handle()?))
    }

    /// Resolve a library and apply limits and defaults from `config`
    pub fn from_config(config: &BindingConfig) -> Argon2Result<Self> {
        let handle = LibraryResolver::from_config(config).resolve()?;
        Self::new(Arc::new(handle)).configured(config)
    }

    /// Apply limits and defaults from `config` to this hasher
    pub fn configured(mut self, config: &BindingConfig) -> Argon2Result<Self> {
        if let Some(max) = config.max_output_len() {
            self.limits = Limits::new(max)?;
        }
        self.defaults = HashOptions::from_config(config)?;
        Ok(self)
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_defaults(mut self, defaults: HashOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Version segment the loaded library writes into encoded strings
    ///
    /// `argon2_hash` takes no version argument, so the version is a property
    /// of the library build. The default, `None`, matches builds that write
    /// `$argon2i$m=..,t=..,p=..$salt$hash` without a `v=` segment.
    pub fn with_encoded_version(mut self, version: Option<u32>) -> Self {
        self.encoded_version = version;
        self
    }

    pub fn encoded_version(&self) -> Option<u32> {
        self.encoded_version
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Options used by the `*_default` calls
    pub fn defaults(&self) -> &HashOptions {
        &self.defaults
    }

    pub fn handle(&self) -> &Arc<NativeHandle> {
        &self.handle
    }

    /// Compute a raw hash of `options.output_len` bytes
    pub fn hash(
        &self,
        password: impl Into<Input>,
        salt: impl Into<Input>,
        options: &HashOptions,
    ) -> Argon2Result<HashResult> {
        let request = HashRequest::new(password, salt, *options)?;
        self.run(&request, false)
    }

    /// [`Argon2::hash`] with this hasher's default options
    pub fn hash_default(
        &self,
        password: impl Into<Input>,
        salt: impl Into<Input>,
    ) -> Argon2Result<HashResult> {
        self.hash(password, salt, &self.defaults)
    }

    /// Raw hash bytes only
    pub fn hash_raw(
        &self,
        password: impl Into<Input>,
        salt: impl Into<Input>,
        options: &HashOptions,
    ) -> Argon2Result<Vec<u8>> {
        self.hash(password, salt, options).map(HashResult::into_bytes)
    }

    /// Raw hash plus the library's encoded string
    pub fn hash_encoded(
        &self,
        password: impl Into<Input>,
        salt: impl Into<Input>,
        options: &HashOptions,
    ) -> Argon2Result<HashResult> {
        let request = HashRequest::new(password, salt, *options)?;
        self.run(&request, true)
    }

    /// Check `password` against an encoded hash
    ///
    /// Recomputes with the encoded parameters and salt, then compares the raw
    /// hashes in constant time. A malformed string is an error, not a mismatch,
    /// and so is a string whose version differs from [`Argon2::encoded_version`]:
    /// the loaded library can only recompute its own version.
    ///
    /// The variant is taken from the string. Libraries without a `v=` segment
    /// tag every string `argon2i`, so only Argon2i hashes from them verify.
    pub fn verify_encoded(&self, encoded: &str, password: impl Into<Input>) -> Argon2Result<bool> {
        let expected = EncodedHash::parse(encoded)?;
        if expected.version != self.encoded_version {
            return Err(Argon2Error::InvalidParameter {
                field: "version",
                reason: format!(
                    "encoded with {}, loaded library writes {}",
                    describe_version(expected.version),
                    describe_version(self.encoded_version)
                ),
            });
        }
        let request = HashRequest::new(
            password,
            expected.salt.clone(),
            expected.to_options(),
        )?;
        let actual = Zeroizing::new(self.run(&request, false)?.into_bytes());
        Ok(ct_eq(&actual, &expected.hash))
    }

    fn run(&self, request: &HashRequest, with_encoded: bool) -> Argon2Result<HashResult> {
        request.validate(&self.limits)?;
        let call = invoke(&self.handle, request, with_encoded);
        translate(call.status)?;
        call.buffers.into_result()
    }
}

/// Hash on the process-wide handle
///
/// Resolves the native library on first use; see
/// [`shared_handle`](crate::loader::shared_handle).
pub fn hash(
    password: impl Into<Input>,
    salt: impl Into<Input>,
    options: &HashOptions,
) -> Argon2Result<HashResult> {
    Argon2::shared()?.hash(password, salt, options)
}

/// Encoded hash on the process-wide handle
pub fn hash_encoded(
    password: impl Into<Input>,
    salt: impl Into<Input>,
    options: &HashOptions,
) -> Argon2Result<HashResult> {
    Argon2::shared()?.hash_encoded(password, salt, options)
}

/// Verify against an encoded hash on the process-wide handle
pub fn verify_encoded(encoded: &str, password: impl Into<Input>) -> Argon2Result<bool> {
    Argon2::shared()?.verify_encoded(encoded, password)
}

fn describe_version(version: Option<u32>) -> String {
    match version {
        Some(v) => format!("version {}", v),
        None => "no version".to_string(),
    }
}

/// Constant-time byte comparison
fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
