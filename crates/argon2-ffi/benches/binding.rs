//! Binding overhead benchmarks
//!
//! Measures the work the binding does around the native call, using a
//! trivial in-process entry point so Argon2 itself is not timed:
//! - Input normalization
//! - Encoded string parsing
//! - Full call pipeline by output size

use argon2_ffi::{normalize, Argon2, EncodedHash, HashOptions, Input, NativeHandle};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::ffi::{c_char, c_int, c_void};
use std::sync::Arc;

unsafe extern "C" fn fill_hash(
    _t: u32,
    _m: u32,
    _p: u32,
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
    std::slice::from_raw_parts_mut(hash as *mut u8, hashlen).fill(0x42);
    0
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_text_64", |b| {
        let text = "x".repeat(64);
        b.iter(|| normalize(Input::from(black_box(text.as_str())), "password"));
    });
}

fn bench_parse_encoded(c: &mut Criterion) {
    c.bench_function("parse_encoded_reference", |b| {
        let encoded =
            "$argon2i$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";
        b.iter(|| EncodedHash::parse(black_box(encoded)));
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let argon2 = Argon2::new(Arc::new(unsafe { NativeHandle::from_fn(fill_hash) }));
    let mut group = c.benchmark_group("pipeline");

    for len in [32usize, 128, 4096] {
        let options = HashOptions::default().with_output_len(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("hash", len), &options, |b, options| {
            b.iter(|| argon2.hash(black_box("password"), "some salt", options));
        });
        group.bench_with_input(BenchmarkId::new("hash_encoded", len), &options, |b, options| {
            b.iter(|| argon2.hash_encoded(black_box("password"), "some salt", options));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_parse_encoded, bench_pipeline);
criterion_main!(benches);
