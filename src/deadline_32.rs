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

//! Scalar deadline search (no SIMD).

use crate::noncegen_common::*;
use crate::shabal256::shabal256_deadline;

/// Searches `nonce_count` nonces for the lowest deadline and accumulates the
/// winner into `best_deadline` / `best_offset` in place.
///
/// `data` holds per-nonce contiguous nonces (the single-lane layout). The
/// scoop pairing follows the PoC2 convention: the first hash is read at
/// `scoop`, the second at the mirror scoop `4095 - scoop`.
///
/// `*best_deadline == 0` on entry means "no result yet"; the first candidate
/// always wins. Repeated calls over disjoint slabs accumulate, with ties
/// resolved in favor of the earlier offset.
pub fn find_best_deadline_32(
    data: &[u8],
    scoop: u64,
    nonce_count: u64,
    gensig: &[u8; 32],
    best_deadline: &mut u64,
    best_offset: &mut u64,
) {
    debug_assert!(scoop < NUM_SCOOPS as u64);
    debug_assert!(data.len() >= nonce_count as usize * NONCE_SIZE);

    let mut has_best = *best_deadline != 0;
    let mirror_scoop = (NUM_SCOOPS as u64 - 1) - scoop;

    for i in 0..nonce_count as usize {
        let base = i * NONCE_SIZE;
        let scoop_start = base + scoop as usize * SCOOP_SIZE;
        let mirror_start = base + mirror_scoop as usize * SCOOP_SIZE + HASH_SIZE;

        let deadline = shabal256_deadline(
            &data[scoop_start..scoop_start + HASH_SIZE],
            &data[mirror_start..mirror_start + HASH_SIZE],
            gensig,
        );

        if !has_best || deadline < *best_deadline {
            *best_deadline = deadline;
            *best_offset = i as u64;
            has_best = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noncegen_32::generate_nonces_32;

    #[test]
    fn test_scalar_deadline_is_naive_minimum() {
        let gensig = [0x11u8; 32];
        let nonce_count = 6u64;
        let scoop = 1234u64;
        let mirror_scoop = 4095 - scoop;

        let mut data = vec![0u8; nonce_count as usize * NONCE_SIZE];
        generate_nonces_32(&mut data, 0, 42, 100, nonce_count);

        let mut expected_deadline = u64::MAX;
        let mut expected_offset = 0u64;
        for i in 0..nonce_count as usize {
            let base = i * NONCE_SIZE;
            let s = base + scoop as usize * SCOOP_SIZE;
            let m = base + mirror_scoop as usize * SCOOP_SIZE + HASH_SIZE;
            let deadline =
                shabal256_deadline(&data[s..s + HASH_SIZE], &data[m..m + HASH_SIZE], &gensig);
            if deadline < expected_deadline {
                expected_deadline = deadline;
                expected_offset = i as u64;
            }
        }

        let mut best_deadline = 0u64;
        let mut best_offset = 0u64;
        find_best_deadline_32(
            &data,
            scoop,
            nonce_count,
            &gensig,
            &mut best_deadline,
            &mut best_offset,
        );
        assert_eq!(best_deadline, expected_deadline);
        assert_eq!(best_offset, expected_offset);
    }

    #[test]
    fn test_scalar_deadline_accumulates_across_calls() {
        let gensig = [0x77u8; 32];
        let scoop = 7u64;

        let mut data = vec![0u8; 8 * NONCE_SIZE];
        generate_nonces_32(&mut data, 0, 7, 0, 8);

        // one pass over everything
        let mut full_deadline = 0u64;
        let mut full_offset = 0u64;
        find_best_deadline_32(&data, scoop, 8, &gensig, &mut full_deadline, &mut full_offset);

        // two passes over disjoint halves, accumulating into the same slots
        let mut deadline = 0u64;
        let mut offset = 0u64;
        find_best_deadline_32(
            &data[..4 * NONCE_SIZE],
            scoop,
            4,
            &gensig,
            &mut deadline,
            &mut offset,
        );
        let first_half = (deadline, offset);
        find_best_deadline_32(
            &data[4 * NONCE_SIZE..],
            scoop,
            4,
            &gensig,
            &mut deadline,
            &mut offset,
        );

        assert_eq!(deadline, full_deadline);
        if full_offset < 4 {
            assert_eq!((deadline, offset), first_half);
        } else {
            assert_eq!(offset, full_offset - 4);
        }
    }
}
