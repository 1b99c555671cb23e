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

use crate::noncegen_common::*;
use crate::shabal256::shabal256;

/// generates a series of nonces and stores them into the cache
/// no SIMD extensions are used
/// * `cache` - buffer to store the nonces into
/// * `cache_offset` - nonce offset in buffer
/// * `numeric_id` - numeric account id
/// * `start_nonce` - nonce to start generation at
/// * `num_nonces` - number of nonces to generate
///
/// Nonces are written in plain per-nonce contiguous order, which is the
/// single-lane case of the interleaved batch layout the SIMD engines use.
pub fn generate_nonces_32(
    cache: &mut [u8],
    cache_offset: usize,
    numeric_id: u64,
    start_nonce: u64,
    num_nonces: u64,
) {
    let numeric_id = be_u64_words(numeric_id);

    let mut final_buffer = [0u8; HASH_SIZE];

    // prepare termination strings
    let mut t1 = [0u32; MESSAGE_SIZE];
    t1[0..2].clone_from_slice(&numeric_id);
    t1[4] = 0x80;

    let mut t2 = [0u32; MESSAGE_SIZE];
    t2[8..10].clone_from_slice(&numeric_id);
    t2[12] = 0x80;

    let mut t3 = [0u32; MESSAGE_SIZE];
    t3[0] = 0x80;

    for n in 0..num_nonces {
        let buffer = &mut cache[(cache_offset + n as usize) * NONCE_SIZE..][..NONCE_SIZE];

        // generate nonce number & change endianness
        let nonce = be_u64_words(start_nonce.wrapping_add(n));

        // store nonce number in relevant termination strings
        t1[2..4].clone_from_slice(&nonce);
        t2[10..12].clone_from_slice(&nonce);

        // start shabal rounds

        // 3 cases: first 128 rounds use case 1 or 2, after that case 3
        // case 1: first 128 rounds, hashes are even: use termination string 1
        // case 2: first 128 rounds, hashes are odd: use termination string 2
        // case 3: round > 128: use termination string 3

        // round 1
        let hash = shabal256(&[], &t1);
        buffer[NONCE_SIZE - HASH_SIZE..NONCE_SIZE].clone_from_slice(&hash);

        // store first hash into smart termination string 2
        for (word, chunk) in t2[0..8].iter_mut().zip(hash.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        // round 2 - 128
        for i in (NONCE_SIZE - HASH_CAP + HASH_SIZE..=NONCE_SIZE - HASH_SIZE)
            .rev()
            .step_by(HASH_SIZE)
        {
            // check if msg can be divided into 512bit packages without a
            // remainder
            if i % 64 == 0 {
                // last msg = seed + termination
                let hash = shabal256(&buffer[i..NONCE_SIZE], &t1);
                buffer[i - HASH_SIZE..i].clone_from_slice(&hash);
            } else {
                // last msg = 256 bit data + seed + termination
                let hash = shabal256(&buffer[i..NONCE_SIZE], &t2);
                buffer[i - HASH_SIZE..i].clone_from_slice(&hash);
            }
        }

        // round 128-8192
        for i in (HASH_SIZE..=NONCE_SIZE - HASH_CAP).rev().step_by(HASH_SIZE) {
            let hash = shabal256(&buffer[i..i + HASH_CAP], &t3);
            buffer[i - HASH_SIZE..i].clone_from_slice(&hash);
        }

        // generate final hash
        final_buffer.clone_from_slice(&shabal256(&buffer[0..NONCE_SIZE], &t1));

        // XOR with final
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte ^= final_buffer[i % HASH_SIZE];
        }
    }
}
