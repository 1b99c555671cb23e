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

//! SIMD deadline search using AVX512F (16 nonces in parallel).

use crate::noncegen_common::*;
use crate::shabal256_lite_avx512::shabal256_lite_512;

/// Searches `nonce_count` nonces for the lowest deadline using the
/// sixteen-lane AVX512F kernel, accumulating into `best_deadline` /
/// `best_offset` in place.
///
/// `data` holds batches of sixteen word-interleaved nonces as written by
/// `generate_nonces_512`; `nonce_count` must be a multiple of 16. Lane order
/// decides ties, so the earliest offset wins, same as the scalar engine.
pub fn find_best_deadline_512(
    data: &[u8],
    scoop: u64,
    nonce_count: u64,
    gensig: &[u8; 32],
    best_deadline: &mut u64,
    best_offset: &mut u64,
) {
    debug_assert!(is_x86_feature_detected!("avx512f"));
    debug_assert!(scoop < NUM_SCOOPS as u64);
    debug_assert_eq!(nonce_count % AVX512_VECTOR_SIZE as u64, 0);
    debug_assert!(data.len() >= nonce_count as usize * NONCE_SIZE);

    let mut has_best = *best_deadline != 0;
    let mirror_scoop = NUM_SCOOPS - 1 - scoop as usize;
    let slab = HASH_SIZE * AVX512_VECTOR_SIZE;

    for i in (0..nonce_count as usize).step_by(AVX512_VECTOR_SIZE) {
        // poc2: u1 first hash, u2 second hash of the mirror scoop
        let base = i * NONCE_SIZE;
        let u1 = base + scoop as usize * SCOOP_SIZE * AVX512_VECTOR_SIZE;
        let u2 =
            base + mirror_scoop * SCOOP_SIZE * AVX512_VECTOR_SIZE + HASH_SIZE * AVX512_VECTOR_SIZE;

        let deadlines =
            unsafe { shabal256_lite_512(&data[u1..u1 + slab], &data[u2..u2 + slab], gensig) };

        for (lane, &deadline) in deadlines.iter().enumerate() {
            if !has_best || deadline < *best_deadline {
                *best_deadline = deadline;
                *best_offset = (i + lane) as u64;
                has_best = true;
            }
        }
    }
}
