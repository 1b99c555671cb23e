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

pub const MESSAGE_SIZE: usize = 16;
pub const HASH_SIZE: usize = 32;
pub const HASH_CAP: usize = 4096;
pub const NUM_SCOOPS: usize = 4096;
pub const SCOOP_SIZE: usize = 64;
pub const NONCE_SIZE: usize = NUM_SCOOPS * SCOOP_SIZE;
pub const SSE2_VECTOR_SIZE: usize = 4;
pub const AVX2_VECTOR_SIZE: usize = 8;
pub const AVX512_VECTOR_SIZE: usize = 16;

/// Big-endian bytes of `value` as the two little-endian message words the
/// seed block carries them in.
pub fn be_u64_words(value: u64) -> [u32; 2] {
    let bytes = value.to_be_bytes();
    [
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
    ]
}

/// Unpacks a lane-interleaved nonce batch into per-nonce contiguous order.
///
/// The SIMD engines keep a batch of `vector_size` nonces word-interleaved:
/// 32-bit word `w` of lane `b` lives at u32 slot `w * vector_size + b`.
/// This scatters each lane into `target` as an ordinary contiguous nonce,
/// lane `b` landing at nonce index `target_offset + b`. With
/// `vector_size == 1` it degenerates to a plain copy.
pub fn unpack_scatter_nonces(
    source: &[u8],
    target: &mut [u8],
    target_offset: usize,
    vector_size: usize,
) {
    assert!(source.len() >= vector_size * NONCE_SIZE);
    assert!(target.len() >= (target_offset + vector_size) * NONCE_SIZE);

    for b in 0..vector_size {
        let nonce_base = (target_offset + b) * NONCE_SIZE;
        for w in 0..NONCE_SIZE / 4 {
            let src = (w * vector_size + b) * 4;
            let dst = nonce_base + w * 4;
            target[dst..dst + 4].copy_from_slice(&source[src..src + 4]);
        }
    }
}

/// Inverse of [`unpack_scatter_nonces`]: packs `vector_size` contiguous
/// nonces starting at nonce index `source_offset` into one lane-interleaved
/// batch.
pub fn gather_pack_nonces(
    source: &[u8],
    source_offset: usize,
    target: &mut [u8],
    vector_size: usize,
) {
    assert!(source.len() >= (source_offset + vector_size) * NONCE_SIZE);
    assert!(target.len() >= vector_size * NONCE_SIZE);

    for b in 0..vector_size {
        let nonce_base = (source_offset + b) * NONCE_SIZE;
        for w in 0..NONCE_SIZE / 4 {
            let src = nonce_base + w * 4;
            let dst = (w * vector_size + b) * 4;
            target[dst..dst + 4].copy_from_slice(&source[src..src + 4]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack_roundtrip() {
        let vector_size = 4;
        let mut nonces = vec![0u8; vector_size * NONCE_SIZE];
        for (i, b) in nonces.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }

        let mut packed = vec![0u8; vector_size * NONCE_SIZE];
        gather_pack_nonces(&nonces, 0, &mut packed, vector_size);

        // Word 0 of every lane comes first in the interleaved layout
        assert_eq!(&packed[0..4], &nonces[0..4]);
        assert_eq!(&packed[4..8], &nonces[NONCE_SIZE..NONCE_SIZE + 4]);

        let mut unpacked = vec![0u8; vector_size * NONCE_SIZE];
        unpack_scatter_nonces(&packed, &mut unpacked, 0, vector_size);
        assert_eq!(unpacked, nonces);
    }

    #[test]
    fn test_unpack_is_identity_for_single_lane() {
        let mut nonce = vec![0u8; NONCE_SIZE];
        for (i, b) in nonce.iter_mut().enumerate() {
            *b = (i % 241) as u8;
        }
        let mut out = vec![0u8; NONCE_SIZE];
        unpack_scatter_nonces(&nonce, &mut out, 0, 1);
        assert_eq!(out, nonce);
    }
}
