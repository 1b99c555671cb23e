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

use crate::buffer::PageAlignedByteBuffer;
use crate::noncegen_common::*;
use crate::shabal256_avx2::shabal256_256;
use std::slice::from_raw_parts_mut;

/// generates a series of nonces and stores them into the cache
/// AVX2 SIMD extensions are used, eight nonces per pass
/// * `cache` - buffer to store the nonces into
/// * `cache_offset` - nonce offset in buffer
/// * `numeric_id` - numeric account id
/// * `start_nonce` - nonce to start generation at
/// * `num_nonces` - number of nonces to generate, multiple of 8
///
/// Each batch of eight nonces is written word-interleaved; see
/// [`unpack_scatter_nonces`] for the layout.
pub fn generate_nonces_256(
    cache: &mut [u8],
    cache_offset: usize,
    numeric_id: u64,
    start_nonce: u64,
    num_nonces: u64,
) {
    debug_assert!(is_x86_feature_detected!("avx2"));
    debug_assert_eq!(num_nonces % AVX2_VECTOR_SIZE as u64, 0);
    debug_assert!(cache.len() >= (cache_offset + num_nonces as usize) * NONCE_SIZE);

    let numeric_id = be_u64_words(numeric_id);

    let mut final_buffer = PageAlignedByteBuffer::new(HASH_SIZE * AVX2_VECTOR_SIZE)
        .expect("Should be able to allocate SIMD hash buffer");

    // prepare termination strings
    let mut t1 = [0u32; MESSAGE_SIZE];
    t1[0..2].clone_from_slice(&numeric_id);
    t1[4] = 0x80;
    let mut t1 = splatter_256(&t1);

    let mut t2 = [0u32; MESSAGE_SIZE];
    t2[8..10].clone_from_slice(&numeric_id);
    t2[12] = 0x80;
    let mut t2 = splatter_256(&t2);

    let mut t3 = [0u32; MESSAGE_SIZE];
    t3[0] = 0x80;
    let t3 = splatter_256(&t3);

    for n in (0..num_nonces as usize).step_by(AVX2_VECTOR_SIZE) {
        let buffer =
            &mut cache[(cache_offset + n) * NONCE_SIZE..][..AVX2_VECTOR_SIZE * NONCE_SIZE];

        // generate nonce numbers & change endianness,
        // then store them in the relevant termination strings
        for i in 0..AVX2_VECTOR_SIZE {
            let nonce = be_u64_words(start_nonce.wrapping_add((n + i) as u64));
            t1[2 * AVX2_VECTOR_SIZE + i] = nonce[0];
            t1[3 * AVX2_VECTOR_SIZE + i] = nonce[1];
            t2[10 * AVX2_VECTOR_SIZE + i] = nonce[0];
            t2[11 * AVX2_VECTOR_SIZE + i] = nonce[1];
        }

        // start shabal rounds

        // 3 cases: first 128 rounds use case 1 or 2, after that case 3
        // case 1: first 128 rounds, hashes are even: use termination string 1
        // case 2: first 128 rounds, hashes are odd: use termination string 2
        // case 3: round > 128: use termination string 3

        // round 1
        unsafe {
            shabal256_256(
                &[],
                &t1,
                &mut buffer[AVX2_VECTOR_SIZE * (NONCE_SIZE - HASH_SIZE)
                    ..AVX2_VECTOR_SIZE * NONCE_SIZE],
            )
        };

        // store first hash into smart termination string 2
        // (data is vectored and SIMD aligned)
        unsafe {
            std::ptr::copy_nonoverlapping(
                buffer.as_ptr().add(AVX2_VECTOR_SIZE * (NONCE_SIZE - HASH_SIZE)),
                t2.as_mut_ptr() as *mut u8,
                HASH_SIZE * AVX2_VECTOR_SIZE,
            );
        }

        // round 2 - 128
        for i in (NONCE_SIZE - HASH_CAP + HASH_SIZE..=NONCE_SIZE - HASH_SIZE)
            .rev()
            .step_by(HASH_SIZE)
        {
            let pointer: &mut [u8] = unsafe {
                from_raw_parts_mut(
                    buffer[(i - HASH_SIZE) * AVX2_VECTOR_SIZE..i * AVX2_VECTOR_SIZE].as_mut_ptr(),
                    HASH_SIZE * AVX2_VECTOR_SIZE,
                )
            };
            // check if msg can be divided into 512bit packages without a
            // remainder
            if i % 64 == 0 {
                // last msg = seed + termination
                unsafe {
                    shabal256_256(
                        &buffer[i * AVX2_VECTOR_SIZE..NONCE_SIZE * AVX2_VECTOR_SIZE],
                        &t1,
                        pointer,
                    )
                };
            } else {
                // last msg = 256 bit data + seed + termination
                unsafe {
                    shabal256_256(
                        &buffer[i * AVX2_VECTOR_SIZE..NONCE_SIZE * AVX2_VECTOR_SIZE],
                        &t2,
                        pointer,
                    )
                };
            }
        }

        // round 128-8192
        for i in (HASH_SIZE..=NONCE_SIZE - HASH_CAP).rev().step_by(HASH_SIZE) {
            let pointer: &mut [u8] = unsafe {
                from_raw_parts_mut(
                    buffer[(i - HASH_SIZE) * AVX2_VECTOR_SIZE..i * AVX2_VECTOR_SIZE].as_mut_ptr(),
                    HASH_SIZE * AVX2_VECTOR_SIZE,
                )
            };
            unsafe {
                shabal256_256(
                    &buffer[i * AVX2_VECTOR_SIZE..(i + HASH_CAP) * AVX2_VECTOR_SIZE],
                    &t3,
                    pointer,
                )
            };
        }

        // generate final hash
        unsafe {
            shabal256_256(
                &buffer[0..NONCE_SIZE * AVX2_VECTOR_SIZE],
                &t1,
                &mut final_buffer,
            )
        };

        // XOR all hashes with the final hash
        let final_size = HASH_SIZE * AVX2_VECTOR_SIZE;
        for chunk in buffer.chunks_exact_mut(final_size) {
            for (byte, mask) in chunk.iter_mut().zip(final_buffer.iter()) {
                *byte ^= *mask;
            }
        }
    }
}

#[inline(always)]
fn splatter_256(input: &[u32; MESSAGE_SIZE]) -> [u32; MESSAGE_SIZE * AVX2_VECTOR_SIZE] {
    let mut result = [0u32; MESSAGE_SIZE * AVX2_VECTOR_SIZE];
    for (j, word) in input.iter().enumerate() {
        for i in 0..AVX2_VECTOR_SIZE {
            result[j * AVX2_VECTOR_SIZE + i] = *word;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noncegen_32::generate_nonces_32;

    #[test]
    fn test_nonce_generation_avx2_matches_scalar() {
        if !is_x86_feature_detected!("avx2") {
            println!("SKIPPED: test_nonce_generation_avx2_matches_scalar - AVX2 not supported");
            return;
        }
        let numeric_id = 7900104405094198526;
        let start_nonce = 1337;

        let mut simd = vec![0u8; AVX2_VECTOR_SIZE * NONCE_SIZE];
        generate_nonces_256(&mut simd, 0, numeric_id, start_nonce, AVX2_VECTOR_SIZE as u64);

        let mut unpacked = vec![0u8; AVX2_VECTOR_SIZE * NONCE_SIZE];
        unpack_scatter_nonces(&simd, &mut unpacked, 0, AVX2_VECTOR_SIZE);

        let mut scalar = vec![0u8; AVX2_VECTOR_SIZE * NONCE_SIZE];
        generate_nonces_32(&mut scalar, 0, numeric_id, start_nonce, AVX2_VECTOR_SIZE as u64);

        assert_eq!(unpacked, scalar);
    }

    #[test]
    fn test_nonce_generation_avx2_multi_batch() {
        if !is_x86_feature_detected!("avx2") {
            println!("SKIPPED: test_nonce_generation_avx2_multi_batch - AVX2 not supported");
            return;
        }
        // Two batches: the second batch must continue the nonce numbering
        let numeric_id = 42;
        let count = 2 * AVX2_VECTOR_SIZE;

        let mut simd = vec![0u8; count * NONCE_SIZE];
        generate_nonces_256(&mut simd, 0, numeric_id, 0, count as u64);

        let mut unpacked = vec![0u8; count * NONCE_SIZE];
        unpack_scatter_nonces(&simd, &mut unpacked, 0, AVX2_VECTOR_SIZE);
        unpack_scatter_nonces(
            &simd[AVX2_VECTOR_SIZE * NONCE_SIZE..],
            &mut unpacked,
            AVX2_VECTOR_SIZE,
            AVX2_VECTOR_SIZE,
        );

        let mut scalar = vec![0u8; count * NONCE_SIZE];
        generate_nonces_32(&mut scalar, 0, numeric_id, 0, count as u64);

        assert_eq!(unpacked, scalar);
    }
}
