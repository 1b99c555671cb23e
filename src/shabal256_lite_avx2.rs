//! Eight-lane deadline hash on 256-bit AVX2 registers.
//!
//! Same contract as the SSE2 lite kernel with eight interleaved lanes.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::noncegen_common::HASH_SIZE;
use crate::shabal256::{A_INIT, B_INIT, C_INIT};
use crate::shabal256_avx2::apply_p;

const SIMD_VECTOR_SIZE: usize = 8;
const MESSAGE_SIZE: usize = 16;

/// # Safety
///
/// Requires AVX2. `u1` and `u2` must each hold `32 * 8` bytes of
/// word-interleaved hash data.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
pub unsafe fn shabal256_lite_256(
    u1: &[u8],
    u2: &[u8],
    gensig: &[u8; 32],
) -> [u64; SIMD_VECTOR_SIZE] {
    debug_assert_eq!(u1.len(), HASH_SIZE * SIMD_VECTOR_SIZE);
    debug_assert_eq!(u2.len(), HASH_SIZE * SIMD_VECTOR_SIZE);

    let mut a: [__m256i; 12] = [_mm256_setzero_si256(); 12];
    let mut b: [__m256i; 16] = [_mm256_setzero_si256(); 16];
    let mut c: [__m256i; 16] = [_mm256_setzero_si256(); 16];
    for i in 0..12 {
        a[i] = _mm256_set1_epi32(A_INIT[i] as i32);
    }
    for i in 0..16 {
        b[i] = _mm256_set1_epi32(B_INIT[i] as i32);
        c[i] = _mm256_set1_epi32(C_INIT[i] as i32);
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

    let message_ptr = message.as_ptr() as *const __m256i;
    for i in 0..16 {
        b[i] = _mm256_add_epi32(b[i], _mm256_loadu_si256(message_ptr.add(i)));
    }
    a[0] = _mm256_xor_si256(a[0], _mm256_set1_epi32(w_low as i32));
    a[1] = _mm256_xor_si256(a[1], _mm256_set1_epi32(w_high as i32));
    apply_p(&mut a, &mut b, &c, message_ptr);
    for i in 0..16 {
        c[i] = _mm256_sub_epi32(c[i], _mm256_loadu_si256(message_ptr.add(i)));
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

    let term_ptr = term.as_ptr() as *const __m256i;
    for i in 0..16 {
        b[i] = _mm256_add_epi32(b[i], _mm256_loadu_si256(term_ptr.add(i)));
    }
    a[0] = _mm256_xor_si256(a[0], _mm256_set1_epi32(w_low as i32));
    a[1] = _mm256_xor_si256(a[1], _mm256_set1_epi32(w_high as i32));
    apply_p(&mut a, &mut b, &c, term_ptr);
    for _ in 0..3 {
        std::mem::swap(&mut b, &mut c);
        a[0] = _mm256_xor_si256(a[0], _mm256_set1_epi32(w_low as i32));
        a[1] = _mm256_xor_si256(a[1], _mm256_set1_epi32(w_high as i32));
        apply_p(&mut a, &mut b, &c, term_ptr);
    }

    // deadline = digest words 0 and 1 per lane
    let mut low = [0u32; SIMD_VECTOR_SIZE];
    let mut high = [0u32; SIMD_VECTOR_SIZE];
    _mm256_storeu_si256(low.as_mut_ptr() as *mut __m256i, b[8]);
    _mm256_storeu_si256(high.as_mut_ptr() as *mut __m256i, b[9]);

    let mut deadlines = [0u64; SIMD_VECTOR_SIZE];
    for lane in 0..SIMD_VECTOR_SIZE {
        deadlines[lane] = u64::from(low[lane]) | (u64::from(high[lane]) << 32);
    }
    deadlines
}
