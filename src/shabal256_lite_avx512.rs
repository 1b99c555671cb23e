//! Sixteen-lane deadline hash on 512-bit AVX512F registers.
//!
//! Same contract as the SSE2 lite kernel with sixteen interleaved lanes.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::noncegen_common::HASH_SIZE;
use crate::shabal256::{A_INIT, B_INIT, C_INIT};
use crate::shabal256_avx512::apply_p;

const SIMD_VECTOR_SIZE: usize = 16;
const MESSAGE_SIZE: usize = 16;

/// # Safety
///
/// Requires AVX512F. `u1` and `u2` must each hold `32 * 16` bytes of
/// word-interleaved hash data.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx512f")]
pub unsafe fn shabal256_lite_512(
    u1: &[u8],
    u2: &[u8],
    gensig: &[u8; 32],
) -> [u64; SIMD_VECTOR_SIZE] {
    debug_assert_eq!(u1.len(), HASH_SIZE * SIMD_VECTOR_SIZE);
    debug_assert_eq!(u2.len(), HASH_SIZE * SIMD_VECTOR_SIZE);

    let mut a: [__m512i; 12] = [_mm512_setzero_si512(); 12];
    let mut b: [__m512i; 16] = [_mm512_setzero_si512(); 16];
    let mut c: [__m512i; 16] = [_mm512_setzero_si512(); 16];
    for i in 0..12 {
        a[i] = _mm512_set1_epi32(A_INIT[i] as i32);
    }
    for i in 0..16 {
        b[i] = _mm512_set1_epi32(B_INIT[i] as i32);
        c[i] = _mm512_set1_epi32(C_INIT[i] as i32);
    }

    let mut w_low = 1u32;
    let w_high = 0u32;

    // block 1: broadcast gensig, scoop slab absorbed in place
    let mut message = [0u32; MESSAGE_SIZE * SIMD_VECTOR_SIZE];
    for (word, chunk) in gensig.chunks_exact(4).enumerate() {
        let value = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        for lane in 0..SIMD_VECTOR_SIZE {
            message[word * SIMD_VECTOR_SIZE + lane] = value;
        }
    }
    std::ptr::copy_nonoverlapping(
        u1.as_ptr(),
        message.as_mut_ptr().add(8 * SIMD_VECTOR_SIZE) as *mut u8,
        HASH_SIZE * SIMD_VECTOR_SIZE,
    );

    let message_ptr = message.as_ptr() as *const __m512i;
    for i in 0..16 {
        b[i] = _mm512_add_epi32(b[i], _mm512_loadu_si512(message_ptr.add(i)));
    }
    a[0] = _mm512_xor_si512(a[0], _mm512_set1_epi32(w_low as i32));
    a[1] = _mm512_xor_si512(a[1], _mm512_set1_epi32(w_high as i32));
    apply_p(&mut a, &mut b, &c, message_ptr);
    for i in 0..16 {
        c[i] = _mm512_sub_epi32(c[i], _mm512_loadu_si512(message_ptr.add(i)));
    }
    std::mem::swap(&mut b, &mut c);
    w_low = w_low.wrapping_add(1);

    // termination block: mirror slab followed by the end marker
    let mut term = [0u32; MESSAGE_SIZE * SIMD_VECTOR_SIZE];
    std::ptr::copy_nonoverlapping(
        u2.as_ptr(),
        term.as_mut_ptr() as *mut u8,
        HASH_SIZE * SIMD_VECTOR_SIZE,
    );
    for lane in 0..SIMD_VECTOR_SIZE {
        term[8 * SIMD_VECTOR_SIZE + lane] = 0x80;
    }

    let term_ptr = term.as_ptr() as *const __m512i;
    for i in 0..16 {
        b[i] = _mm512_add_epi32(b[i], _mm512_loadu_si512(term_ptr.add(i)));
    }
    a[0] = _mm512_xor_si512(a[0], _mm512_set1_epi32(w_low as i32));
    a[1] = _mm512_xor_si512(a[1], _mm512_set1_epi32(w_high as i32));
    apply_p(&mut a, &mut b, &c, term_ptr);
    for _ in 0..3 {
        std::mem::swap(&mut b, &mut c);
        a[0] = _mm512_xor_si512(a[0], _mm512_set1_epi32(w_low as i32));
        a[1] = _mm512_xor_si512(a[1], _mm512_set1_epi32(w_high as i32));
        apply_p(&mut a, &mut b, &c, term_ptr);
    }

    // deadline = digest words 0 and 1 per lane
    let mut low = [0u32; SIMD_VECTOR_SIZE];
    let mut high = [0u32; SIMD_VECTOR_SIZE];
    _mm512_storeu_si512(low.as_mut_ptr() as *mut __m512i, b[8]);
    _mm512_storeu_si512(high.as_mut_ptr() as *mut __m512i, b[9]);

    let mut deadlines = [0u64; SIMD_VECTOR_SIZE];
    for lane in 0..SIMD_VECTOR_SIZE {
        deadlines[lane] = u64::from(low[lane]) | (u64::from(high[lane]) << 32);
    }
    deadlines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shabal256::shabal256_deadline;

    const TEST_C_RESULT: u64 = 0x9824d76d62cd4f2f;
    const TEST_D_RESULT: u64 = 0x2ACEA174774F5A6A;

    #[test]
    fn test_shabal256_lite_avx512_golden() {
        if !is_x86_feature_detected!("avx512f") {
            println!("SKIPPED: test_shabal256_lite_avx512_golden - AVX512 not supported by CPU");
            return;
        }
        let u1 = [0u8; HASH_SIZE * SIMD_VECTOR_SIZE];
        let u2 = [0u8; HASH_SIZE * SIMD_VECTOR_SIZE];

        let deadlines = unsafe { shabal256_lite_512(&u1, &u2, &[0u8; 32]) };
        for (lane, &deadline) in deadlines.iter().enumerate() {
            assert_eq!(deadline, TEST_C_RESULT, "lane {} mismatch", lane);
        }

        let gensig: [u8; 32] =
            hex::decode("4a6f686e6e7946464d206861742064656e206772f6df74656e2050656e697321")
                .unwrap()
                .try_into()
                .unwrap();
        let deadlines = unsafe { shabal256_lite_512(&u1, &u2, &gensig) };
        for (lane, &deadline) in deadlines.iter().enumerate() {
            assert_eq!(deadline, TEST_D_RESULT, "lane {} mismatch", lane);
        }
    }

    #[test]
    fn test_shabal256_lite_avx512_matches_scalar() {
        if !is_x86_feature_detected!("avx512f") {
            println!(
                "SKIPPED: test_shabal256_lite_avx512_matches_scalar - AVX512 not supported by CPU"
            );
            return;
        }
        let gensig = [0x3Cu8; 32];

        let mut scoops = [[0u8; HASH_SIZE]; SIMD_VECTOR_SIZE];
        let mut mirrors = [[0u8; HASH_SIZE]; SIMD_VECTOR_SIZE];
        for lane in 0..SIMD_VECTOR_SIZE {
            for i in 0..HASH_SIZE {
                scoops[lane][i] = (lane * 31 + i) as u8;
                mirrors[lane][i] = (lane * 77 + i * 3) as u8;
            }
        }
        let mut u1 = [0u8; HASH_SIZE * SIMD_VECTOR_SIZE];
        let mut u2 = [0u8; HASH_SIZE * SIMD_VECTOR_SIZE];
        for lane in 0..SIMD_VECTOR_SIZE {
            for word in 0..HASH_SIZE / 4 {
                let offset = (word * SIMD_VECTOR_SIZE + lane) * 4;
                u1[offset..offset + 4].copy_from_slice(&scoops[lane][word * 4..word * 4 + 4]);
                u2[offset..offset + 4].copy_from_slice(&mirrors[lane][word * 4..word * 4 + 4]);
            }
        }

        let deadlines = unsafe { shabal256_lite_512(&u1, &u2, &gensig) };
        for lane in 0..SIMD_VECTOR_SIZE {
            let expected = shabal256_deadline(&scoops[lane], &mirrors[lane], &gensig);
            assert_eq!(deadlines[lane], expected, "lane {} mismatch", lane);
        }
    }
}
