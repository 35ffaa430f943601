// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! Raw RGBA image buffer.
//!
//! [`RawImage`] is the boundary contract of the engine: a `width × height`
//! pixel grid stored as a flat byte buffer in R,G,B,A order, 8 bits per
//! channel. File codecs (PNG etc.) and canvas bindings live outside this
//! crate and convert to/from this shape.
//!
//! The buffer length is validated once at construction; every other layer
//! can then index pixels without re-checking.

use crate::stego::error::StegoError;

/// Bytes per pixel (R, G, B, A).
pub const BYTES_PER_PIXEL: usize = 4;

/// A raw RGBA image buffer.
///
/// Invariant: `pixels.len() == width * height * 4`, enforced by [`RawImage::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Wrap a pixel buffer, validating its length against the dimensions.
    ///
    /// # Errors
    /// Returns [`StegoError::PixelBufferMismatch`] if `pixels.len()` is not
    /// exactly `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, StegoError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(StegoError::PixelBufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The flat RGBA pixel buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image, returning the pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Copy a `size × size` pixel block with top-left `(x, y)` into a fresh
    /// contiguous buffer (row-major, RGBA).
    ///
    /// Caller guarantees the block lies fully inside the image.
    pub(crate) fn copy_tile(&self, x: usize, y: usize, size: usize) -> Vec<u8> {
        debug_assert!(x + size <= self.width as usize && y + size <= self.height as usize);
        let w = self.width as usize;
        let mut tile = Vec::with_capacity(size * size * BYTES_PER_PIXEL);
        for row in 0..size {
            let src = ((y + row) * w + x) * BYTES_PER_PIXEL;
            tile.extend_from_slice(&self.pixels[src..src + size * BYTES_PER_PIXEL]);
        }
        tile
    }

    /// Paste a contiguous `size × size` RGBA block back at top-left `(x, y)`.
    ///
    /// Caller guarantees the block lies fully inside the image and that
    /// `tile.len() == size * size * 4`.
    pub(crate) fn paste_tile(&mut self, x: usize, y: usize, size: usize, tile: &[u8]) {
        debug_assert_eq!(tile.len(), size * size * BYTES_PER_PIXEL);
        let w = self.width as usize;
        for row in 0..size {
            let dst = ((y + row) * w + x) * BYTES_PER_PIXEL;
            let src = row * size * BYTES_PER_PIXEL;
            self.pixels[dst..dst + size * BYTES_PER_PIXEL]
                .copy_from_slice(&tile[src..src + size * BYTES_PER_PIXEL]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(w: u32, h: u32) -> RawImage {
        let mut pixels = Vec::with_capacity(w as usize * h as usize * 4);
        for y in 0..h {
            for x in 0..w {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 77, 255]);
            }
        }
        RawImage::new(w, h, pixels).unwrap()
    }

    #[test]
    fn buffer_length_validated() {
        assert!(RawImage::new(2, 2, vec![0u8; 16]).is_ok());
        assert!(matches!(
            RawImage::new(2, 2, vec![0u8; 15]),
            Err(StegoError::PixelBufferMismatch { expected: 16, actual: 15 })
        ));
        assert!(RawImage::new(0, 0, Vec::new()).is_ok());
    }

    #[test]
    fn tile_copy_paste_roundtrip() {
        let mut img = gradient_image(16, 16);
        let tile = img.copy_tile(4, 8, 4);
        assert_eq!(tile.len(), 4 * 4 * 4);
        // First pixel of the tile is image pixel (4, 8).
        assert_eq!(&tile[..4], &[4, 8, 77, 255]);

        let original = img.clone();
        img.paste_tile(4, 8, 4, &tile);
        assert_eq!(img, original, "pasting an unmodified tile is a no-op");
    }

    #[test]
    fn paste_only_touches_target_block() {
        let mut img = gradient_image(16, 16);
        let blank = vec![0u8; 4 * 4 * 4];
        img.paste_tile(0, 0, 4, &blank);
        // Inside the block: zeroed.
        assert_eq!(&img.pixels()[..4], &[0, 0, 0, 0]);
        // First pixel right of the block (x=4, y=0): untouched.
        let idx = 4 * 4;
        assert_eq!(&img.pixels()[idx..idx + 4], &[4, 0, 77, 255]);
    }
}
