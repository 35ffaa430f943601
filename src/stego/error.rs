// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! Error types for the steganography engine.
//!
//! Only caller-misuse conditions are errors. A tile that carries no message,
//! a corrupted frame, or a non-UTF-8 payload are all *expected* outcomes of
//! scanning an arbitrary image, so decode paths report them as `None` rather
//! than through this enum.

use core::fmt;

/// Errors that can occur during steganographic encoding.
#[derive(Debug)]
pub enum StegoError {
    /// The pixel buffer length does not match `width * height * 4`.
    PixelBufferMismatch {
        /// Expected buffer length in bytes.
        expected: usize,
        /// Actual buffer length in bytes.
        actual: usize,
    },
    /// The image holds no whole 64×64 tile, so nothing can be embedded.
    ImageTooSmall,
    /// The framed message exceeds the per-tile bit capacity.
    MessageTooLarge,
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PixelBufferMismatch { expected, actual } => {
                write!(f, "pixel buffer is {actual} bytes, expected {expected} (width*height*4)")
            }
            Self::ImageTooSmall => write!(f, "image too small for a single tile"),
            Self::MessageTooLarge => write!(f, "message too large for tile capacity"),
        }
    }
}

impl std::error::Error for StegoError {}
