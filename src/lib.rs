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

#![crate_name = "burst_hashlib"]

//! # Burst Hashlib - Shabal256 Plotting and Mining Primitives
//!
//! This library provides the SIMD-accelerated Shabal256 nonce generation and
//! deadline search used by Burst/Signum proof-of-capacity plotters and
//! miners.
//!
//! ## Features
//!
//! - **SIMD Acceleration**: Automatic detection and use of SSE2, AVX2, and
//!   AVX512F instruction sets, hashing 4/8/16 nonces in parallel
//! - **Bit-exact**: Every vector width and the scalar fallback produce
//!   byte-identical nonces and identical deadlines
//! - **Safe API**: Buffer validation and typed errors in the dispatching
//!   wrappers; the per-width engines check their preconditions in debug
//!   builds
//!
//! ## Main Functions
//!
//! - [`generate_nonces`] - Plot a range of nonces with the widest SIMD path
//!   available
//! - [`find_best_deadline`] - Scan plotted nonces for the lowest deadline of
//!   a mining round
//! - [`calculate_scoop`] - Determine the scoop number from block height and
//!   generation signature
//! - [`calculate_deadline`] - Plot-and-score a single nonce, e.g. to verify
//!   a submission
//!
//! ## Example Usage
//!
//! ```rust
//! use burst_hashlib::noncegen_common::NONCE_SIZE;
//! use burst_hashlib::{find_best_deadline, generate_nonces};
//!
//! let mut cache = vec![0u8; NONCE_SIZE];
//! generate_nonces(&mut cache, 0, 7900104405094198526, 1337, 1)
//!     .expect("Should be able to generate nonces");
//!
//! let gensig = [0u8; 32];
//! let (deadline, offset) = find_best_deadline(&cache, 42, 1, &gensig)
//!     .expect("Should be able to scan for deadlines");
//! assert_eq!(offset, 0);
//! assert!(deadline > 0);
//! ```
//!
//! ## Memory layout
//!
//! The SIMD engines produce nonces in batches of the vector width, each
//! batch interleaved at 32-bit word granularity (word `w` of lane `b` at u32
//! slot `w * width + b`). [`find_best_deadline`] consumes exactly the layout
//! [`generate_nonces`] produced on the same machine; use
//! [`detect_simd_width`] and [`noncegen_common::unpack_scatter_nonces`] to
//! transpose batches into per-nonce order for storage.

// x86/x86_64 SIMD imports
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::deadline_128::find_best_deadline_128;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::deadline_256::find_best_deadline_256;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::deadline_512::find_best_deadline_512;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::noncegen_128::generate_nonces_128;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::noncegen_256::generate_nonces_256;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::noncegen_512::generate_nonces_512;

// Always available (scalar) imports
use crate::deadline_32::find_best_deadline_32;
use crate::noncegen_32::generate_nonces_32;
use crate::noncegen_common::*;
use crate::shabal256::{block_words, shabal256, Shabal256};

mod buffer;
pub mod deadline_32;
pub mod error;
pub mod noncegen_32;
pub mod noncegen_common;
pub mod shabal256;

// x86/x86_64 SIMD modules
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod deadline_128;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod deadline_256;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod deadline_512;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod noncegen_128;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod noncegen_256;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod noncegen_512;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod shabal256_avx2;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod shabal256_avx512;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod shabal256_lite_avx2;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod shabal256_lite_avx512;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod shabal256_lite_sse2;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod shabal256_sse2;

pub use buffer::PageAlignedByteBuffer;
// Re-export main error types for convenience
pub use error::{PocHashError, Result};

/// Warms up the Shabal256 bootstrap state.
///
/// The post-IV state every hash starts from is baked into the kernels as
/// compile-time constants, so there is no process-wide context left to
/// populate and no required initialization order; this idempotent entry
/// point is kept for drop-in parity with the C engine and, in debug builds,
/// cross-checks the baked constants against a freshly derived IV absorption.
pub fn init_shabal() {
    debug_assert_eq!(Shabal256::init(256), Shabal256::fast());
}

/// Reports the nonce batch width [`generate_nonces`] and
/// [`find_best_deadline`] use on this CPU (16/8/4, or 1 for the scalar
/// fallback).
///
/// Callers that transpose or persist the cache need this to interpret the
/// interleaved batch layout.
pub fn detect_simd_width() -> usize {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("avx512f") {
            return AVX512_VECTOR_SIZE;
        }
        if is_x86_feature_detected!("avx2") {
            return AVX2_VECTOR_SIZE;
        }
        if is_x86_feature_detected!("sse2") {
            return SSE2_VECTOR_SIZE;
        }
    }
    1
}

/// generates a series of nonces into the cache using the widest SIMD path
/// available, with a scalar tail for counts that are not a multiple of the
/// vector width
/// * `cache` - buffer to store the nonces into
/// * `cache_offset` - nonce offset in buffer
/// * `numeric_id` - numeric account id
/// * `start_nonce` - nonce to start generation at
/// * `num_nonces` - number of nonces to generate
///
/// # Errors
///
/// Returns [`PocHashError::BufferSizeError`] if `cache` cannot hold
/// `cache_offset + num_nonces` nonces.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn generate_nonces(
    cache: &mut [u8],
    cache_offset: usize,
    numeric_id: u64,
    start_nonce: u64,
    num_nonces: u64,
) -> Result<()> {
    validate_cache(cache.len(), cache_offset, num_nonces)?;

    // vectorize using SIMD if possible
    if is_x86_feature_detected!("avx512f") {
        let simd_nonces = num_nonces / AVX512_VECTOR_SIZE as u64 * AVX512_VECTOR_SIZE as u64;
        let remainder = num_nonces % AVX512_VECTOR_SIZE as u64;
        if simd_nonces > 0 {
            generate_nonces_512(cache, cache_offset, numeric_id, start_nonce, simd_nonces);
        }
        if remainder > 0 {
            generate_nonces_32(
                cache,
                cache_offset + simd_nonces as usize,
                numeric_id,
                start_nonce.wrapping_add(simd_nonces),
                remainder,
            );
        }
    } else if is_x86_feature_detected!("avx2") {
        let simd_nonces = num_nonces / AVX2_VECTOR_SIZE as u64 * AVX2_VECTOR_SIZE as u64;
        let remainder = num_nonces % AVX2_VECTOR_SIZE as u64;
        if simd_nonces > 0 {
            generate_nonces_256(cache, cache_offset, numeric_id, start_nonce, simd_nonces);
        }
        if remainder > 0 {
            generate_nonces_32(
                cache,
                cache_offset + simd_nonces as usize,
                numeric_id,
                start_nonce.wrapping_add(simd_nonces),
                remainder,
            );
        }
    } else if is_x86_feature_detected!("sse2") {
        let simd_nonces = num_nonces / SSE2_VECTOR_SIZE as u64 * SSE2_VECTOR_SIZE as u64;
        let remainder = num_nonces % SSE2_VECTOR_SIZE as u64;
        if simd_nonces > 0 {
            generate_nonces_128(cache, cache_offset, numeric_id, start_nonce, simd_nonces);
        }
        if remainder > 0 {
            generate_nonces_32(
                cache,
                cache_offset + simd_nonces as usize,
                numeric_id,
                start_nonce.wrapping_add(simd_nonces),
                remainder,
            );
        }
    } else {
        generate_nonces_32(cache, cache_offset, numeric_id, start_nonce, num_nonces);
    }

    Ok(())
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
pub fn generate_nonces(
    cache: &mut [u8],
    cache_offset: usize,
    numeric_id: u64,
    start_nonce: u64,
    num_nonces: u64,
) -> Result<()> {
    validate_cache(cache.len(), cache_offset, num_nonces)?;
    generate_nonces_32(cache, cache_offset, numeric_id, start_nonce, num_nonces);
    Ok(())
}

/// searches the lowest deadline in a series of plotted nonces and returns
/// `(best_deadline, best_offset)`
///
/// `data` must be laid out exactly as [`generate_nonces`] produced it on
/// this machine: SIMD-width batches interleaved, scalar tail contiguous.
///
/// # Errors
///
/// Returns [`PocHashError::InvalidInput`] if `scoop >= 4096` and
/// [`PocHashError::BufferSizeError`] if `data` is shorter than
/// `nonce_count` nonces.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub fn find_best_deadline(
    data: &[u8],
    scoop: u64,
    nonce_count: u64,
    gensig: &[u8; 32],
) -> Result<(u64, u64)> {
    validate_deadline_input(data.len(), scoop, nonce_count)?;

    let mut best_deadline = 0u64;
    let mut best_offset = 0u64;

    // Use the best available SIMD implementation with runtime detection
    if is_x86_feature_detected!("avx512f") {
        let simd_nonces = nonce_count / AVX512_VECTOR_SIZE as u64 * AVX512_VECTOR_SIZE as u64;
        let remainder = nonce_count % AVX512_VECTOR_SIZE as u64;
        if simd_nonces > 0 {
            find_best_deadline_512(
                data,
                scoop,
                simd_nonces,
                gensig,
                &mut best_deadline,
                &mut best_offset,
            );
        }
        merge_scalar_tail(
            data,
            scoop,
            simd_nonces,
            remainder,
            gensig,
            &mut best_deadline,
            &mut best_offset,
        );
    } else if is_x86_feature_detected!("avx2") {
        let simd_nonces = nonce_count / AVX2_VECTOR_SIZE as u64 * AVX2_VECTOR_SIZE as u64;
        let remainder = nonce_count % AVX2_VECTOR_SIZE as u64;
        if simd_nonces > 0 {
            find_best_deadline_256(
                data,
                scoop,
                simd_nonces,
                gensig,
                &mut best_deadline,
                &mut best_offset,
            );
        }
        merge_scalar_tail(
            data,
            scoop,
            simd_nonces,
            remainder,
            gensig,
            &mut best_deadline,
            &mut best_offset,
        );
    } else if is_x86_feature_detected!("sse2") {
        let simd_nonces = nonce_count / SSE2_VECTOR_SIZE as u64 * SSE2_VECTOR_SIZE as u64;
        let remainder = nonce_count % SSE2_VECTOR_SIZE as u64;
        if simd_nonces > 0 {
            find_best_deadline_128(
                data,
                scoop,
                simd_nonces,
                gensig,
                &mut best_deadline,
                &mut best_offset,
            );
        }
        merge_scalar_tail(
            data,
            scoop,
            simd_nonces,
            remainder,
            gensig,
            &mut best_deadline,
            &mut best_offset,
        );
    } else {
        find_best_deadline_32(
            data,
            scoop,
            nonce_count,
            gensig,
            &mut best_deadline,
            &mut best_offset,
        );
    }

    Ok((best_deadline, best_offset))
}

#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
pub fn find_best_deadline(
    data: &[u8],
    scoop: u64,
    nonce_count: u64,
    gensig: &[u8; 32],
) -> Result<(u64, u64)> {
    validate_deadline_input(data.len(), scoop, nonce_count)?;

    let mut best_deadline = 0u64;
    let mut best_offset = 0u64;
    find_best_deadline_32(
        data,
        scoop,
        nonce_count,
        gensig,
        &mut best_deadline,
        &mut best_offset,
    );
    Ok((best_deadline, best_offset))
}

/// Scans the contiguous scalar tail behind the SIMD batches and folds its
/// winner into the accumulated result.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
#[allow(clippy::too_many_arguments)]
fn merge_scalar_tail(
    data: &[u8],
    scoop: u64,
    simd_nonces: u64,
    remainder: u64,
    gensig: &[u8; 32],
    best_deadline: &mut u64,
    best_offset: &mut u64,
) {
    if remainder == 0 {
        return;
    }
    let mut tail_deadline = 0u64;
    let mut tail_offset = 0u64;
    find_best_deadline_32(
        &data[simd_nonces as usize * NONCE_SIZE..],
        scoop,
        remainder,
        gensig,
        &mut tail_deadline,
        &mut tail_offset,
    );
    if *best_deadline == 0 || tail_deadline < *best_deadline {
        *best_deadline = tail_deadline;
        *best_offset = simd_nonces + tail_offset;
    }
}

fn validate_cache(cache_len: usize, cache_offset: usize, num_nonces: u64) -> Result<()> {
    let required_size = (cache_offset + num_nonces as usize) * NONCE_SIZE;
    if cache_len < required_size {
        return Err(PocHashError::BufferSizeError(format!(
            "Cache buffer too small: need {} bytes, have {} bytes",
            required_size, cache_len
        )));
    }
    Ok(())
}

fn validate_deadline_input(data_len: usize, scoop: u64, nonce_count: u64) -> Result<()> {
    if scoop >= NUM_SCOOPS as u64 {
        return Err(PocHashError::InvalidInput(format!(
            "Scoop number {} must be less than {}",
            scoop, NUM_SCOOPS
        )));
    }
    let required_size = nonce_count as usize * NONCE_SIZE;
    if data_len < required_size {
        return Err(PocHashError::BufferSizeError(format!(
            "Plot data too small: need {} bytes, have {} bytes",
            required_size, data_len
        )));
    }
    Ok(())
}

/// calculates the scoop number for a specific height and generation
/// signature
pub fn calculate_scoop(height: u64, gensig: &[u8; 32]) -> u64 {
    let mut data = [0u8; 64];
    data[..32].clone_from_slice(gensig);
    data[32..40].clone_from_slice(&height.to_be_bytes());
    data[40] = 0x80;

    let new_gensig = shabal256(&[], &block_words(&data));
    (u64::from(new_gensig[30] & 0x0F) << 8) | u64::from(new_gensig[31])
}

/// calculates the next generation signature from the previous one and the
/// generator's account id
pub fn calculate_new_gensig(generator_id: u64, gensig: &[u8; 32]) -> [u8; 32] {
    let mut data = [0u8; 64];
    data[..32].clone_from_slice(gensig);
    data[32..40].clone_from_slice(&generator_id.to_be_bytes());
    data[40] = 0x80;

    shabal256(&[], &block_words(&data))
}

/// converts a hex string representation of a generation signature into a
/// byte array
pub fn decode_gensig(gensig: &str) -> Result<[u8; 32]> {
    let mut gensig_bytes = [0; 32];
    hex::decode_to_slice(gensig, &mut gensig_bytes).map_err(|e| {
        PocHashError::HexDecodeError(format!(
            "Failed to decode generation signature '{}': {}",
            gensig, e
        ))
    })?;
    Ok(gensig_bytes)
}

/// plots a single nonce and calculates its deadline for a given scoop,
/// e.g. to verify a miner's submission
/// * `numeric_id` - numeric account id
/// * `nonce` - nonce number
/// * `scoop` - scoop number (must be < 4096)
/// * `gensig` - generation signature of the round
///
/// # Errors
///
/// Returns [`PocHashError::InvalidInput`] if `scoop >= 4096`.
pub fn calculate_deadline(numeric_id: u64, nonce: u64, scoop: u64, gensig: &[u8; 32]) -> Result<u64> {
    if scoop >= NUM_SCOOPS as u64 {
        return Err(PocHashError::InvalidInput(format!(
            "Scoop number {} must be less than {}",
            scoop, NUM_SCOOPS
        )));
    }

    let mut nonce_buffer = vec![0u8; NONCE_SIZE];
    generate_nonces_32(&mut nonce_buffer, 0, numeric_id, nonce, 1);

    let mut best_deadline = 0u64;
    let mut best_offset = 0u64;
    find_best_deadline_32(
        &nonce_buffer,
        scoop,
        1,
        gensig,
        &mut best_deadline,
        &mut best_offset,
    );
    Ok(best_deadline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_shabal_idempotent() {
        init_shabal();
        init_shabal();
    }

    #[test]
    pub fn test_calculate_scoop() {
        let height = 0;
        let gensig =
            decode_gensig("9821beb3b34d9a3b30127c05f8d1e9006f8a02f565a3572145134bbe34d37a76")
                .unwrap();

        let scoop = calculate_scoop(height, &gensig);
        assert_eq!(scoop, 667);
    }

    #[test]
    fn test_calculate_scoop_in_range() {
        let gensig = [0xABu8; 32];
        for height in [0u64, 1, 500_000, u64::MAX] {
            assert!(calculate_scoop(height, &gensig) < NUM_SCOOPS as u64);
        }
    }

    #[test]
    fn test_calculate_new_gensig_changes_with_generator() {
        let gensig = [0x42u8; 32];
        let a = calculate_new_gensig(1, &gensig);
        let b = calculate_new_gensig(2, &gensig);
        assert_ne!(a, b);
        assert_eq!(a, calculate_new_gensig(1, &gensig));
    }

    #[test]
    fn test_decode_gensig_valid() {
        let hex_string = "9821beb3b34d9a3b30127c05f8d1e9006f8a02f565a3572145134bbe34d37a76";
        let result = decode_gensig(hex_string);
        assert!(result.is_ok());
    }

    #[test]
    fn test_decode_gensig_invalid_length() {
        let hex_string = "9821beb3b34d9a3b30127c05f8d1e900"; // Too short
        let result = decode_gensig(hex_string);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_gensig_invalid_hex() {
        let hex_string = "gggggggggggggggggggggggggggggggggggggggggggggggggggggggggggggggg";
        let result = decode_gensig(hex_string);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_nonces_buffer_validation() {
        let mut cache = vec![0u8; NONCE_SIZE - 1];
        let result = generate_nonces(&mut cache, 0, 1, 0, 1);
        assert!(matches!(result, Err(PocHashError::BufferSizeError(_))));
    }

    #[test]
    fn test_find_best_deadline_invalid_scoop() {
        let data = vec![0u8; NONCE_SIZE];
        let result = find_best_deadline(&data, 5000, 1, &[0u8; 32]);
        assert!(matches!(result, Err(PocHashError::InvalidInput(_))));
    }

    #[test]
    fn test_calculate_deadline_invalid_scoop() {
        let result = calculate_deadline(1, 0, 4096, &[0u8; 32]);
        assert!(matches!(result, Err(PocHashError::InvalidInput(_))));
    }

    #[test]
    fn test_calculate_deadline_matches_engine() {
        let numeric_id = 10282355196851764065;
        let gensig = [0u8; 32];
        let scoop = 0;

        let mut cache = vec![0u8; NONCE_SIZE];
        generate_nonces_32(&mut cache, 0, numeric_id, 0, 1);
        let mut expected = 0u64;
        let mut offset = 0u64;
        find_best_deadline_32(&cache, scoop, 1, &gensig, &mut expected, &mut offset);

        assert_eq!(
            calculate_deadline(numeric_id, 0, scoop, &gensig).unwrap(),
            expected
        );
    }
}
