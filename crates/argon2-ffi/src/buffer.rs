//! Output buffer ownership
//!
//! [`OutputBuffers`] owns the memory the native function writes into for the
//! duration of one call. Lengths handed to native code are always read back
//! from the allocation itself, so the length argument can never exceed the
//! buffer. Buffers are wiped on drop; a failed call exposes nothing.
//!
//! Buffers are sized from validated requests only, so they cannot be built
//! from outside the crate:
//!
//! ```compile_fail
//! let buffers = argon2_ffi::buffer::OutputBuffers::allocate(0, None);
//! ```

use crate::error::{Argon2Error, Argon2Result, ErrorCode};
use crate::types::{HashRequest, HashResult, Variant};
use std::ffi::{c_char, c_void};
use zeroize::Zeroize;

/// Version tag the reference library writes into encoded hashes
pub const ENCODED_VERSION: u32 = 0x13;

/// Buffers written by one native call
pub(crate) struct OutputBuffers {
    hash: Vec<u8>,
    encoded: Option<Vec<u8>>,
}

impl OutputBuffers {
    /// Allocate zeroed buffers of exactly the given sizes
    pub(crate) fn allocate(output_len: usize, encoded_len: Option<usize>) -> Self {
        Self {
            hash: vec![0u8; output_len],
            encoded: encoded_len.map(|len| vec![0u8; len]),
        }
    }

    /// Allocate for a request, optionally with room for the encoded string
    pub(crate) fn for_request(request: &HashRequest, with_encoded: bool) -> Self {
        let options = request.options();
        let encoded = with_encoded.then(|| {
            encoded_len(
                options.variant,
                options.time_cost,
                options.memory_cost,
                options.parallelism,
                request.salt().len(),
                options.output_len,
            )
        });
        Self::allocate(options.output_len, encoded)
    }

    pub fn hash_len(&self) -> usize {
        self.hash.len()
    }

    /// Encoded buffer length, 0 when no encoded output was requested
    pub fn encoded_len(&self) -> usize {
        self.encoded.as_ref().map_or(0, Vec::len)
    }

    #[cfg(test)]
    fn has_encoded(&self) -> bool {
        self.encoded.is_some()
    }

    pub(crate) fn hash_ptr(&mut self) -> *mut c_void {
        self.hash.as_mut_ptr().cast()
    }

    /// Null when no encoded output was requested
    pub(crate) fn encoded_ptr(&mut self) -> *mut c_char {
        match self.encoded.as_mut() {
            Some(buf) => buf.as_mut_ptr().cast(),
            None => std::ptr::null_mut(),
        }
    }

    /// Move the written bytes into a caller-owned result
    ///
    /// Only call after the native status translated to success.
    pub(crate) fn into_result(mut self) -> Argon2Result<HashResult> {
        let encoded = match self.encoded.as_deref() {
            Some(buf) => Some(read_c_string(buf)?),
            None => None,
        };
        let raw = std::mem::take(&mut self.hash);
        Ok(HashResult::new(raw, encoded))
    }
}

impl Drop for OutputBuffers {
    fn drop(&mut self) {
        self.hash.zeroize();
        if let Some(encoded) = self.encoded.as_mut() {
            encoded.zeroize();
        }
    }
}

/// Read a NUL-terminated ASCII string out of a native buffer
fn read_c_string(buf: &[u8]) -> Argon2Result<String> {
    let end = buf
        .iter()
        .position(|&b| b == 0)
        .ok_or(Argon2Error::Native(ErrorCode::EncodingFail))?;
    std::str::from_utf8(&buf[..end])
        .map(str::to_owned)
        .map_err(|_| Argon2Error::Native(ErrorCode::EncodingFail))
}

/// Unpadded base64 length of `len` bytes
pub fn base64_len(len: usize) -> usize {
    (len / 3) * 4
        + match len % 3 {
            0 => 0,
            1 => 2,
            _ => 3,
        }
}

/// Bytes needed for an encoded hash string, including the terminating NUL
///
/// Sized for `$<variant>$v=19$m=<m>,t=<t>,p=<p>$<salt>$<hash>`, which also
/// covers the shorter `$argon2i$m=<m>,t=<t>,p=<p>$<salt>$<hash>`.
pub fn encoded_len(
    variant: Variant,
    time_cost: u32,
    memory_cost: u32,
    parallelism: u32,
    salt_len: usize,
    output_len: usize,
) -> usize {
    let digits = |n: u32| n.to_string().len();

    1 + variant.name().len()
        + "$v=".len()
        + digits(ENCODED_VERSION)
        + "$m=".len()
        + digits(memory_cost)
        + ",t=".len()
        + digits(time_cost)
        + ",p=".len()
        + digits(parallelism)
        + 1
        + base64_len(salt_len)
        + 1
        + base64_len(output_len)
        + 1
}
