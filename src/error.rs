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

/// Error types for the burst_hashlib crate
use std::fmt;

/// Main error type for PoC hash library operations
#[derive(Debug, Clone, PartialEq)]
pub enum PocHashError {
    /// Memory allocation failure
    AllocationError(String),
    /// Buffer size validation error
    BufferSizeError(String),
    /// Invalid input parameters
    InvalidInput(String),
    /// Hexadecimal decoding error
    HexDecodeError(String),
    /// Layout creation error for page alignment
    LayoutError(String),
}

impl fmt::Display for PocHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PocHashError::AllocationError(msg) => write!(f, "Memory allocation failed: {}", msg),
            PocHashError::BufferSizeError(msg) => write!(f, "Buffer size error: {}", msg),
            PocHashError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PocHashError::HexDecodeError(msg) => write!(f, "Hex decode error: {}", msg),
            PocHashError::LayoutError(msg) => write!(f, "Layout error: {}", msg),
        }
    }
}

impl std::error::Error for PocHashError {}

impl From<hex::FromHexError> for PocHashError {
    fn from(err: hex::FromHexError) -> Self {
        PocHashError::HexDecodeError(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PocHashError>;
