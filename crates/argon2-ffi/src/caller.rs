//! Native function calling through a typed function pointer
//!
//! The `argon2_hash` signature is fixed, so it is reproduced once as
//! [`Argon2HashFn`] and called directly; no dynamic signature dispatch is
//! needed.
//!
//! Calls only happen through the hashing API, after parameters are
//! validated; the invoker is not reachable from outside the crate:
//!
//! ```compile_fail
//! use argon2_ffi::caller::invoke;
//! ```

use crate::buffer::OutputBuffers;
use crate::loader::NativeHandle;
use crate::types::HashRequest;
use std::ffi::{c_char, c_int, c_void};

/// Name of the single native entry point
pub const ENTRY_SYMBOL: &str = "argon2_hash";

/// `argon2_hash` as exported by libargon2
///
/// Argument order: time cost, memory cost, parallelism, password ptr/len,
/// salt ptr/len, hash ptr/len, encoded ptr/len (null/0 when unused), variant.
/// Returns 0 on success, a documented status otherwise.
pub type Argon2HashFn = unsafe extern "C" fn(
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
) -> c_int;

/// Outcome of one native call: the raw status plus the buffers it wrote
pub(crate) struct NativeCall {
    pub status: c_int,
    pub buffers: OutputBuffers,
}

/// Call the native entry point for `request`
///
/// `request` must already have passed [`HashRequest::validate`]. Allocates
/// the output buffers (exactly `output_len` bytes of hash, plus
/// the encoded buffer when `with_encoded`), then blocks until the native
/// computation returns. The status is not interpreted here.
pub(crate) fn invoke(
    handle: &NativeHandle,
    request: &HashRequest,
    with_encoded: bool,
) -> NativeCall {
    let mut buffers = OutputBuffers::for_request(request, with_encoded);
    let options = request.options();
    let password = request.password();
    let salt = request.salt();

    let hash_len = buffers.hash_len();
    let encoded_len = buffers.encoded_len();
    let hash_ptr = buffers.hash_ptr();
    let encoded_ptr = buffers.encoded_ptr();

    // SAFETY: the handle guarantees `entry` has the `argon2_hash` ABI and stays
    // loaded while borrowed. Every pointer comes from a live allocation paired
    // with that allocation's own length; the encoded pair is null/0 when absent.
    let status = unsafe {
        (handle.entry())(
            options.time_cost,
            options.memory_cost,
            options.parallelism,
            password.as_ptr().cast(),
            password.len(),
            salt.as_ptr().cast(),
            salt.len(),
            hash_ptr,
            hash_len,
            encoded_ptr,
            encoded_len,
            options.variant.code(),
        )
    };

    NativeCall { status, buffers }
}
