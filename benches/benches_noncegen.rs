// Copyright (c) 2025 Proof of Capacity Consortium
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use burst_hashlib::noncegen_32::generate_nonces_32;
use burst_hashlib::noncegen_common::{
    AVX2_VECTOR_SIZE, AVX512_VECTOR_SIZE, NONCE_SIZE, SSE2_VECTOR_SIZE,
};

const NUMERIC_ID: u64 = 7900104405094198526;
const START_NONCE: u64 = 1337;

fn bench_nonce_generation_none(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonce_gen");
    group.sample_size(10);
    group.throughput(Throughput::Elements(1));

    let mut buf = vec![0; NONCE_SIZE];

    group.bench_function("generate_nonces_32", |b| {
        b.iter(|| {
            generate_nonces_32(&mut buf, 0, NUMERIC_ID, START_NONCE, 1);
        })
    });
}

fn bench_nonce_generation_sse2(c: &mut Criterion) {
    if !is_x86_feature_detected!("sse2") {
        return;
    }
    use burst_hashlib::noncegen_128::generate_nonces_128;

    let mut group = c.benchmark_group("nonce_gen");
    group.sample_size(10);
    group.throughput(Throughput::Elements(SSE2_VECTOR_SIZE as u64));

    let mut buf = vec![0; SSE2_VECTOR_SIZE * NONCE_SIZE];

    group.bench_function("generate_nonces_128", |b| {
        b.iter(|| {
            generate_nonces_128(
                &mut buf,
                0,
                NUMERIC_ID,
                START_NONCE,
                SSE2_VECTOR_SIZE as u64,
            );
        })
    });
}

fn bench_nonce_generation_avx2(c: &mut Criterion) {
    if !is_x86_feature_detected!("avx2") {
        return;
    }
    use burst_hashlib::noncegen_256::generate_nonces_256;

    let mut group = c.benchmark_group("nonce_gen");
    group.sample_size(10);
    group.throughput(Throughput::Elements(AVX2_VECTOR_SIZE as u64));

    let mut buf = vec![0; AVX2_VECTOR_SIZE * NONCE_SIZE];

    group.bench_function("generate_nonces_256", |b| {
        b.iter(|| {
            generate_nonces_256(
                &mut buf,
                0,
                NUMERIC_ID,
                START_NONCE,
                AVX2_VECTOR_SIZE as u64,
            );
        })
    });
}

fn bench_nonce_generation_avx512(c: &mut Criterion) {
    if !is_x86_feature_detected!("avx512f") {
        return;
    }
    use burst_hashlib::noncegen_512::generate_nonces_512;

    let mut group = c.benchmark_group("nonce_gen");
    group.sample_size(10);
    group.throughput(Throughput::Elements(AVX512_VECTOR_SIZE as u64));

    let mut buf = vec![0; AVX512_VECTOR_SIZE * NONCE_SIZE];

    group.bench_function("generate_nonces_512", |b| {
        b.iter(|| {
            generate_nonces_512(
                &mut buf,
                0,
                NUMERIC_ID,
                START_NONCE,
                AVX512_VECTOR_SIZE as u64,
            );
        })
    });
}

criterion_group!(
    benches,
    bench_nonce_generation_none,
    bench_nonce_generation_sse2,
    bench_nonce_generation_avx2,
    bench_nonce_generation_avx512
);
criterion_main!(benches);
