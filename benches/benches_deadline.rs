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

use burst_hashlib::deadline_32::find_best_deadline_32;
use burst_hashlib::noncegen_common::NONCE_SIZE;

const TOTAL_NONCES: u64 = 64;
const SCOOP: u64 = 667;

fn bench_data() -> Vec<u8> {
    // Search cost does not depend on the plot contents, so patterned filler
    // stands in for real nonces
    (0..TOTAL_NONCES as usize * NONCE_SIZE)
        .map(|i| (i % 251) as u8)
        .collect()
}

fn bench_deadline_none(c: &mut Criterion) {
    let mut group = c.benchmark_group("deadline_search");
    group.sample_size(20);
    group.throughput(Throughput::Elements(TOTAL_NONCES));

    let gensig = [0x55u8; 32];
    let data = bench_data();

    group.bench_function("find_best_deadline_32", |b| {
        b.iter(|| {
            let mut deadline = 0u64;
            let mut offset = 0u64;
            find_best_deadline_32(&data, SCOOP, TOTAL_NONCES, &gensig, &mut deadline, &mut offset);
            (deadline, offset)
        })
    });
}

fn bench_deadline_sse2(c: &mut Criterion) {
    if !is_x86_feature_detected!("sse2") {
        return;
    }
    use burst_hashlib::deadline_128::find_best_deadline_128;

    let mut group = c.benchmark_group("deadline_search");
    group.sample_size(20);
    group.throughput(Throughput::Elements(TOTAL_NONCES));

    let gensig = [0x55u8; 32];
    let data = bench_data();

    group.bench_function("find_best_deadline_128", |b| {
        b.iter(|| {
            let mut deadline = 0u64;
            let mut offset = 0u64;
            find_best_deadline_128(&data, SCOOP, TOTAL_NONCES, &gensig, &mut deadline, &mut offset);
            (deadline, offset)
        })
    });
}

fn bench_deadline_avx2(c: &mut Criterion) {
    if !is_x86_feature_detected!("avx2") {
        return;
    }
    use burst_hashlib::deadline_256::find_best_deadline_256;

    let mut group = c.benchmark_group("deadline_search");
    group.sample_size(20);
    group.throughput(Throughput::Elements(TOTAL_NONCES));

    let gensig = [0x55u8; 32];
    let data = bench_data();

    group.bench_function("find_best_deadline_256", |b| {
        b.iter(|| {
            let mut deadline = 0u64;
            let mut offset = 0u64;
            find_best_deadline_256(&data, SCOOP, TOTAL_NONCES, &gensig, &mut deadline, &mut offset);
            (deadline, offset)
        })
    });
}

fn bench_deadline_avx512(c: &mut Criterion) {
    if !is_x86_feature_detected!("avx512f") {
        return;
    }
    use burst_hashlib::deadline_512::find_best_deadline_512;

    let mut group = c.benchmark_group("deadline_search");
    group.sample_size(20);
    group.throughput(Throughput::Elements(TOTAL_NONCES));

    let gensig = [0x55u8; 32];
    let data = bench_data();

    group.bench_function("find_best_deadline_512", |b| {
        b.iter(|| {
            let mut deadline = 0u64;
            let mut offset = 0u64;
            find_best_deadline_512(&data, SCOOP, TOTAL_NONCES, &gensig, &mut deadline, &mut offset);
            (deadline, offset)
        })
    });
}

criterion_group!(
    benches,
    bench_deadline_none,
    bench_deadline_avx512,
    bench_deadline_avx2,
    bench_deadline_sse2
);
criterion_main!(benches);
