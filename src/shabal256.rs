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

//! Scalar Shabal-256 reference implementation (no SIMD).
//!
//! This is the bit-exact single-stream counterpart of the lane-interleaved
//! kernels. It serves as the fallback on CPUs without the required vector
//! extensions, as the tail handler for nonce counts that are not a multiple
//! of the vector width, and as the reference the SIMD paths are tested
//! against.
//!
//! Message words are little-endian 32-bit, blocks are 64 bytes. A message is
//! absorbed as full 64-byte blocks followed by one prepared termination
//! block that already carries the trailing message bytes and the 0x80
//! end-of-message marker.

pub const A_INIT: [u32; 12] = [
    0x52F84552, 0xE54B7999, 0x2D8EE3EC, 0xB9645191, 0xE0078B86, 0xBB7C44C9, 0xD2B5C1CA, 0xB0D2EB8C,
    0x14CE5A45, 0x22AF50DC, 0xEFFDBC6B, 0xEB21B74A,
];

pub const B_INIT: [u32; 16] = [
    0xB555C6EE, 0x3E710596, 0xA72A652F, 0x9301515F, 0xDA28C1FA, 0x696FD868, 0x9CB6BF72, 0x0AFE4002,
    0xA6E03615, 0x5138C1D4, 0xBE216306, 0xB38B8890, 0x3EA8B96B, 0x3299ACE4, 0x30924DD4, 0x55CB34A5,
];

pub const C_INIT: [u32; 16] = [
    0xB405F031, 0xC4233EBA, 0xB3733979, 0xC0DD9D55, 0xC51C28AE, 0xA327B8E1, 0x56C56167, 0xED614433,
    0x88B59D60, 0x60E2CEBA, 0x758B4B8B, 0x83E82A7F, 0xBC968828, 0xE6E00BF7, 0xBA839E55, 0x9B491C60,
];

/// Shabal-256 state: the (A, B, C) register file plus the 64-bit block
/// counter split into two 32-bit words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shabal256 {
    a: [u32; 12],
    b: [u32; 16],
    c: [u32; 16],
    w_low: u32,
    w_high: u32,
}

impl Shabal256 {
    /// The state after the IV absorption — every hash starts from a copy of
    /// this. Baked in so hashing never has to rerun [`Shabal256::init`].
    pub fn fast() -> Self {
        Shabal256 {
            a: A_INIT,
            b: B_INIT,
            c: C_INIT,
            w_low: 1,
            w_high: 0,
        }
    }

    /// Derives the post-IV state from scratch: zeroed registers, counter at
    /// 0xFFFFFFFF_FFFFFFFF, then two blocks of the out_size-dependent IV
    /// schedule. `init(256)` reproduces [`Shabal256::fast`] exactly.
    pub fn init(out_size: u32) -> Self {
        let mut ctx = Shabal256 {
            a: [0; 12],
            b: [0; 16],
            c: [0; 16],
            w_low: u32::MAX,
            w_high: u32::MAX,
        };
        let mut iv = [0u32; 16];
        for (j, word) in iv.iter_mut().enumerate() {
            *word = out_size + j as u32;
        }
        ctx.compress(&iv);
        for (j, word) in iv.iter_mut().enumerate() {
            *word = out_size + 16 + j as u32;
        }
        ctx.compress(&iv);
        ctx
    }

    /// Absorbs one 64-byte message block and advances the counter.
    pub fn compress(&mut self, m: &[u32; 16]) {
        for (b, word) in self.b.iter_mut().zip(m.iter()) {
            *b = b.wrapping_add(*word);
        }
        self.a[0] ^= self.w_low;
        self.a[1] ^= self.w_high;
        self.apply_p(m);
        for (c, word) in self.c.iter_mut().zip(m.iter()) {
            *c = c.wrapping_sub(*word);
        }
        std::mem::swap(&mut self.b, &mut self.c);
        self.w_low = self.w_low.wrapping_add(1);
        if self.w_low == 0 {
            self.w_high = self.w_high.wrapping_add(1);
        }
    }

    /// Absorbs the final (terminator-carrying) block, runs the three extra
    /// permutation rounds with the counter held, and emits the digest.
    pub fn close(&mut self, m: &[u32; 16]) -> [u8; 32] {
        for (b, word) in self.b.iter_mut().zip(m.iter()) {
            *b = b.wrapping_add(*word);
        }
        self.a[0] ^= self.w_low;
        self.a[1] ^= self.w_high;
        self.apply_p(m);
        for _ in 0..3 {
            std::mem::swap(&mut self.b, &mut self.c);
            self.a[0] ^= self.w_low;
            self.a[1] ^= self.w_high;
            self.apply_p(m);
        }

        let mut digest = [0u8; 32];
        for (bytes, word) in digest.chunks_exact_mut(4).zip(self.b[8..16].iter()) {
            bytes.copy_from_slice(&word.to_le_bytes());
        }
        digest
    }

    fn apply_p(&mut self, m: &[u32; 16]) {
        for b in self.b.iter_mut() {
            *b = b.rotate_left(17);
        }

        for step in 0..48 {
            let j = step & 15;
            let xa0 = step % 12;
            let xa1 = (step + 11) % 12;
            let xb1 = (j + 13) & 15;
            let xb2 = (j + 9) & 15;
            let xb3 = (j + 6) & 15;
            let xc = (24 - j) & 15;

            let tt = self.a[xa1].rotate_left(15).wrapping_mul(5);
            let tt = (self.a[xa0] ^ tt ^ self.c[xc]).wrapping_mul(3);
            let tt = tt ^ self.b[xb1] ^ (self.b[xb2] & !self.b[xb3]) ^ m[j];
            self.a[xa0] = tt;
            self.b[j] = self.b[j].rotate_left(1) ^ !tt;
        }

        let mut xc = 6;
        for _ in 0..3 {
            for xa in (0..12).rev() {
                self.a[xa] = self.a[xa].wrapping_add(self.c[xc]);
                xc = (xc + 15) & 15;
            }
        }
    }
}

pub(crate) fn block_words(bytes: &[u8]) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// Shabal-256 over block-aligned `data` followed by the prepared
/// termination block `term`.
///
/// `data` is consumed in 64-byte blocks; a trailing half block is ignored —
/// its bytes are expected to already sit in `term`, which is how the nonce
/// chain carries the re-hashed top hash through the odd steps.
pub fn shabal256(data: &[u8], term: &[u32; 16]) -> [u8; 32] {
    let mut ctx = Shabal256::fast();
    for chunk in data.chunks_exact(64) {
        ctx.compress(&block_words(chunk));
    }
    ctx.close(term)
}

/// Shabal-256 of an arbitrary-length message, building the standard 0x80
/// padding itself.
pub fn shabal256_digest(data: &[u8]) -> [u8; 32] {
    let full = data.len() / 64 * 64;
    let rem = data.len() - full;
    let mut tail = [0u8; 64];
    tail[..rem].copy_from_slice(&data[full..]);
    tail[rem] = 0x80;
    shabal256(&data[..full], &block_words(&tail))
}

/// Deadline hash for one nonce: Shabal-256 over
/// `gensig || scoop_hash || mirror_hash`, first eight digest bytes read as a
/// little-endian u64 on every host.
///
/// `scoop` is the first hash of the round's scoop, `mirror` the second hash
/// of its mirror scoop (the partner a PoC2 read yields in one go).
pub fn shabal256_deadline(scoop: &[u8], mirror: &[u8], gensig: &[u8; 32]) -> u64 {
    debug_assert_eq!(scoop.len(), 32);
    debug_assert_eq!(mirror.len(), 32);

    let mut block = [0u8; 64];
    block[..32].copy_from_slice(gensig);
    block[32..].copy_from_slice(scoop);

    let mut term = [0u8; 64];
    term[..32].copy_from_slice(mirror);
    term[32] = 0x80;

    let digest = shabal256(&block, &block_words(&term));
    u64::from_le_bytes([
        digest[0], digest[1], digest[2], digest[3], digest[4], digest[5], digest[6], digest[7],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_A_RESULT: [u8; 32] = [
        0xDA, 0x8F, 0x08, 0xC0, 0x2A, 0x67, 0xBA, 0x9A, 0x56, 0xBD, 0xD0, 0x79, 0x8E, 0x48, 0xAE,
        0x07, 0x14, 0x21, 0x5E, 0x09, 0x3B, 0x5B, 0x85, 0x06, 0x49, 0xA3, 0x77, 0x18, 0x99, 0x3F,
        0x54, 0xA2,
    ];
    const TEST_B_RESULT: [u8; 32] = [
        0xB4, 0x9F, 0x34, 0xBF, 0x51, 0x86, 0x4C, 0x30, 0x53, 0x3C, 0xC4, 0x6C, 0xC2, 0x54, 0x2B,
        0xDE, 0xC2, 0xF9, 0x6F, 0xD0, 0x6F, 0x5C, 0x53, 0x9A, 0xFF, 0x6E, 0xAD, 0x58, 0x83, 0xF7,
        0x32, 0x7A,
    ];
    const TEST_B_MESSAGE: &[u8] = b"abcdefghijklmnopqrstuvwxyz-0123456789-\
          ABCDEFGHIJKLMNOPQRSTUVWXYZ-0123456789-abcdefghijklmnopqrstuvwxyz";
    const TEST_C_RESULT: u64 = 0x9824d76d62cd4f2f;
    const TEST_D_RESULT: u64 = 0x2ACEA174774F5A6A;

    #[test]
    fn test_iv_derivation_matches_fast_state() {
        assert_eq!(Shabal256::init(256), Shabal256::fast());
    }

    #[test]
    fn test_shabal256_kat_zero_block() {
        assert_eq!(shabal256_digest(&[0u8; 64]), TEST_A_RESULT);

        // Same message via the prepared-termination entry point
        let mut term = [0u32; 16];
        term[0] = 0x80;
        assert_eq!(shabal256(&[0u8; 64], &term), TEST_A_RESULT);
    }

    #[test]
    fn test_shabal256_kat_reference_message() {
        assert_eq!(TEST_B_MESSAGE.len(), 102);
        assert_eq!(shabal256_digest(TEST_B_MESSAGE), TEST_B_RESULT);
    }

    #[test]
    fn test_deadline_golden_values() {
        assert_eq!(
            shabal256_deadline(&[0u8; 32], &[0u8; 32], &[0u8; 32]),
            TEST_C_RESULT
        );

        let gensig: [u8; 32] =
            hex::decode("4a6f686e6e7946464d206861742064656e206772f6df74656e2050656e697321")
                .unwrap()
                .try_into()
                .unwrap();
        assert_eq!(
            shabal256_deadline(&[0u8; 32], &[0u8; 32], &gensig),
            TEST_D_RESULT
        );
    }

    #[test]
    fn test_deadline_is_digest_prefix() {
        // The deadline of all-zero inputs is the little-endian prefix of the
        // digest of 96 zero bytes
        let digest = shabal256_digest(&[0u8; 96]);
        let expected = u64::from_le_bytes(digest[..8].try_into().unwrap());
        assert_eq!(
            shabal256_deadline(&[0u8; 32], &[0u8; 32], &[0u8; 32]),
            expected
        );
    }

    #[test]
    fn test_trailing_half_block_is_carried_by_term() {
        // 96 bytes of message: one full block absorbed from data, the
        // trailing 32 bytes re-supplied through the termination block
        let mut data = [0u8; 96];
        for (i, b) in data.iter_mut().enumerate() {
            *b = i as u8;
        }
        let mut term = [0u8; 64];
        term[..32].copy_from_slice(&data[64..]);
        term[32] = 0x80;

        let mut term_words = [0u32; 16];
        for (w, chunk) in term_words.iter_mut().zip(term.chunks_exact(4)) {
            *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        assert_eq!(shabal256(&data, &term_words), shabal256_digest(&data));
    }
}
