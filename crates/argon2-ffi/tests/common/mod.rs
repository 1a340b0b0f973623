//! Shared test utilities
//!
//! Provides an in-process stand-in for the native `argon2_hash` so the
//! binding can be exercised without libargon2 installed. The stand-in is not
//! Argon2: it derives output with SHA-256 in counter mode over every input,
//! and reproduces the native argument checks and status codes.

#![allow(dead_code)]

use argon2_ffi::{Argon2, NativeHandle};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::ffi::{c_char, c_int, c_void};
use std::sync::Arc;

pub use pretty_assertions::{assert_eq, assert_ne};

pub const ARGON2_OK: c_int = 0;
pub const ARGON2_OUTPUT_PTR_NULL: c_int = 1;
pub const ARGON2_OUTPUT_TOO_SHORT: c_int = 2;
pub const ARGON2_SALT_TOO_SHORT: c_int = 6;
pub const ARGON2_TIME_TOO_SMALL: c_int = 12;
pub const ARGON2_MEMORY_TOO_LITTLE: c_int = 14;
pub const ARGON2_LANES_TOO_FEW: c_int = 16;
pub const ARGON2_INCORRECT_TYPE: c_int = 26;
pub const ARGON2_ENCODING_FAIL: c_int = 31;

/// Salts shorter than this are rejected, as by libargon2
pub const MIN_SALT_LEN: usize = 8;

/// Encoded string layout written by a library build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedFormat {
    /// `$argon2i$m=..,t=..,p=..$salt$hash`, tagged `argon2i` for every variant
    Unversioned,
    /// `$<variant>$v=19$m=..,t=..,p=..$salt$hash`
    Versioned,
}

/// Deterministic stand-in with the `argon2_hash` ABI
///
/// Encodes the way libargon2 builds without a version argument do.
///
/// # Safety
///
/// Same contract as the native function.
pub unsafe extern "C" fn fake_argon2_hash(
    t_cost: u32,
    m_cost: u32,
    parallelism: u32,
    pwd: *const c_void,
    pwdlen: usize,
    salt: *const c_void,
    saltlen: usize,
    hash: *mut c_void,
    hashlen: usize,
    encoded: *mut c_char,
    encodedlen: usize,
    variant: u32,
) -> c_int {
    stand_in(
        t_cost,
        m_cost,
        parallelism,
        bytes(pwd, pwdlen),
        bytes(salt, saltlen),
        hash,
        hashlen,
        encoded,
        encodedlen,
        variant,
        EncodedFormat::Unversioned,
    )
}

/// [`fake_argon2_hash`] writing version 19 strings tagged with the variant
///
/// # Safety
///
/// Same contract as the native function.
pub unsafe extern "C" fn versioned_argon2_hash(
    t_cost: u32,
    m_cost: u32,
    parallelism: u32,
    pwd: *const c_void,
    pwdlen: usize,
    salt: *const c_void,
    saltlen: usize,
    hash: *mut c_void,
    hashlen: usize,
    encoded: *mut c_char,
    encodedlen: usize,
    variant: u32,
) -> c_int {
    stand_in(
        t_cost,
        m_cost,
        parallelism,
        bytes(pwd, pwdlen),
        bytes(salt, saltlen),
        hash,
        hashlen,
        encoded,
        encodedlen,
        variant,
        EncodedFormat::Versioned,
    )
}

#[allow(clippy::too_many_arguments)]
unsafe fn stand_in(
    t_cost: u32,
    m_cost: u32,
    parallelism: u32,
    pwd: &[u8],
    salt: &[u8],
    hash: *mut c_void,
    hashlen: usize,
    encoded: *mut c_char,
    encodedlen: usize,
    variant: u32,
    format: EncodedFormat,
) -> c_int {
    if hash.is_null() {
        return ARGON2_OUTPUT_PTR_NULL;
    }
    if hashlen < 4 {
        return ARGON2_OUTPUT_TOO_SHORT;
    }
    if salt.len() < MIN_SALT_LEN {
        return ARGON2_SALT_TOO_SHORT;
    }
    if t_cost < 1 {
        return ARGON2_TIME_TOO_SMALL;
    }
    if parallelism < 1 {
        return ARGON2_LANES_TOO_FEW;
    }
    if (m_cost as u64) < 8 * parallelism as u64 {
        return ARGON2_MEMORY_TOO_LITTLE;
    }
    let name = match variant {
        0 => "argon2d",
        1 => "argon2i",
        2 => "argon2id",
        _ => return ARGON2_INCORRECT_TYPE,
    };

    let out = std::slice::from_raw_parts_mut(hash as *mut u8, hashlen);
    derive(t_cost, m_cost, parallelism, variant, pwd, salt, out);

    if !encoded.is_null() {
        let costs = format!("m={},t={},p={}", m_cost, t_cost, parallelism);
        let salt_b64 = STANDARD_NO_PAD.encode(salt);
        let hash_b64 = STANDARD_NO_PAD.encode(&*out);
        let text = match format {
            EncodedFormat::Unversioned => format!("$argon2i${}${}${}", costs, salt_b64, hash_b64),
            EncodedFormat::Versioned => {
                format!("${}$v=19${}${}${}", name, costs, salt_b64, hash_b64)
            }
        };
        if text.len() + 1 > encodedlen {
            return ARGON2_ENCODING_FAIL;
        }
        let dest = std::slice::from_raw_parts_mut(encoded as *mut u8, encodedlen);
        dest[..text.len()].copy_from_slice(text.as_bytes());
        dest[text.len()] = 0;
    }

    ARGON2_OK
}

/// Writes garbage into the output, then reports status 99
///
/// # Safety
///
/// Same contract as the native function.
pub unsafe extern "C" fn unknown_status_hash(
    _t_cost: u32,
    _m_cost: u32,
    _parallelism: u32,
    _pwd: *const c_void,
    _pwdlen: usize,
    _salt: *const c_void,
    _saltlen: usize,
    hash: *mut c_void,
    hashlen: usize,
    _encoded: *mut c_char,
    _encodedlen: usize,
    _variant: u32,
) -> c_int {
    std::slice::from_raw_parts_mut(hash as *mut u8, hashlen).fill(0x5A);
    99
}

unsafe fn bytes<'a>(ptr: *const c_void, len: usize) -> &'a [u8] {
    if len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(ptr as *const u8, len)
    }
}

fn derive(t: u32, m: u32, p: u32, variant: u32, pwd: &[u8], salt: &[u8], out: &mut [u8]) {
    let out_len = out.len() as u64;
    for (counter, chunk) in out.chunks_mut(32).enumerate() {
        let mut hasher = Sha256::new();
        hasher.update((counter as u64).to_le_bytes());
        hasher.update(out_len.to_le_bytes());
        hasher.update(t.to_le_bytes());
        hasher.update(m.to_le_bytes());
        hasher.update(p.to_le_bytes());
        hasher.update(variant.to_le_bytes());
        hasher.update((pwd.len() as u64).to_le_bytes());
        hasher.update(pwd);
        hasher.update((salt.len() as u64).to_le_bytes());
        hasher.update(salt);
        let digest = hasher.finalize();
        chunk.copy_from_slice(&digest[..chunk.len()]);
    }
}

/// Handle around [`fake_argon2_hash`]
pub fn fake_handle() -> Arc<NativeHandle> {
    Arc::new(unsafe { NativeHandle::from_fn(fake_argon2_hash) })
}

/// Hasher around [`fake_argon2_hash`]
pub fn fake_hasher() -> Argon2 {
    Argon2::new(fake_handle())
}

/// Hasher around [`versioned_argon2_hash`], expecting version 19 strings
pub fn versioned_hasher() -> Argon2 {
    Argon2::new(Arc::new(unsafe { NativeHandle::from_fn(versioned_argon2_hash) }))
        .with_encoded_version(Some(0x13))
}

/// Hasher whose native call always reports status 99
pub fn unknown_status_hasher() -> Argon2 {
    Argon2::new(Arc::new(unsafe { NativeHandle::from_fn(unknown_status_hash) }))
}
