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

//! Page-aligned byte buffers for nonce caches and hashing scratch space.

use crate::error::{PocHashError, Result};
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// A zero-initialized byte buffer aligned to the OS page size.
///
/// Page alignment satisfies every SIMD alignment requirement of the hashing
/// kernels and keeps large caches friendly to direct I/O in the surrounding
/// plotter and miner code.
#[derive(Debug)]
pub struct PageAlignedByteBuffer {
    data: NonNull<u8>,
    layout: Layout,
}

impl PageAlignedByteBuffer {
    /// Allocates a zeroed, page-aligned buffer of `buffer_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`PocHashError::LayoutError`] if the size/alignment pair is
    /// not representable and [`PocHashError::AllocationError`] if the
    /// allocator fails.
    pub fn new(buffer_size: usize) -> Result<Self> {
        let page_size = page_size::get();
        let layout = Layout::from_size_align(buffer_size, page_size).map_err(|e| {
            PocHashError::LayoutError(format!(
                "Cannot create page-aligned layout for size {}: {}",
                buffer_size, e
            ))
        })?;

        // SAFETY: the layout has non-zero alignment; a zero-sized layout is
        // handled by the dangling pointer branch below.
        let data = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            NonNull::new(unsafe { alloc_zeroed(layout) }).ok_or_else(|| {
                PocHashError::AllocationError(format!(
                    "Failed to allocate {} bytes of page-aligned memory",
                    buffer_size
                ))
            })?
        };

        Ok(PageAlignedByteBuffer { data, layout })
    }

    /// Size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.layout.size()
    }

    /// True if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }
}

impl Deref for PageAlignedByteBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // SAFETY: data points to a live allocation of layout.size() bytes
        // owned exclusively by self.
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.layout.size()) }
    }
}

impl DerefMut for PageAlignedByteBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above, plus &mut self guarantees unique access.
        unsafe { std::slice::from_raw_parts_mut(self.data.as_ptr(), self.layout.size()) }
    }
}

impl Drop for PageAlignedByteBuffer {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: data and layout were created together in new() and the
            // allocation has not been freed before.
            unsafe {
                dealloc(self.data.as_ptr(), self.layout);
            }
        }
    }
}

// SAFETY: the buffer owns its allocation exclusively; access follows the
// usual &/&mut borrow rules through Deref/DerefMut.
unsafe impl Send for PageAlignedByteBuffer {}
unsafe impl Sync for PageAlignedByteBuffer {}

#[cfg(test)]
mod buffer_tests {
    use super::PageAlignedByteBuffer;

    #[test]
    fn buffer_creation_destruction_test() {
        let test = PageAlignedByteBuffer::new(1024 * 1024)
            .expect("Should be able to allocate 1MB page-aligned buffer");
        assert_eq!(test.len(), 1024 * 1024);
        drop(test);
    }

    #[test]
    fn buffer_is_zeroed_and_aligned() {
        let buffer = PageAlignedByteBuffer::new(4096).expect("4KB allocation failed");
        assert!(buffer.iter().all(|&b| b == 0));
        assert_eq!(buffer.as_ptr() as usize % page_size::get(), 0);
    }

    #[test]
    fn buffer_allocation_error_test() {
        // Impossibly large size to exercise the error path
        let result = PageAlignedByteBuffer::new(usize::MAX);
        assert!(result.is_err());
        assert!(
            matches!(
                result,
                Err(crate::error::PocHashError::AllocationError(_))
                    | Err(crate::error::PocHashError::LayoutError(_))
            ),
            "Expected allocation or layout error, got: {:?}",
            result
        );
    }

    #[test]
    fn buffer_access_test() {
        let mut buffer =
            PageAlignedByteBuffer::new(4096).expect("Should be able to allocate 4KB buffer");

        buffer[0] = 42;
        buffer[4095] = 24;
        assert_eq!(buffer[0], 42);
        assert_eq!(buffer[4095], 24);
    }
}
