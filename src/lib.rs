// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! # tessera-core
//!
//! Pure-Rust steganography engine for hiding short text messages in the
//! pixel data of RGBA images. The message is framed (magic + length +
//! checksum), embedded one bit per pixel into every 64×64 tile of the image,
//! and recovered by majority vote across tiles — so the message survives
//! cropping as long as a handful of tiles stay intact.
//!
//! Image file I/O (PNG decode/encode), canvas bindings, and overlay drawing
//! are external collaborators; this crate works on raw `{width, height,
//! RGBA bytes}` buffers only. The message is hidden, not encrypted.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tessera_core::{RawImage, encode, decode, decode_cropped};
//!
//! let image = RawImage::new(width, height, rgba_pixels)?;
//! let stego = encode(&image, "secret message")?;
//!
//! let result = decode(&stego).unwrap();
//! assert_eq!(result.message, "secret message");
//!
//! // After a crop of unknown geometry:
//! let result = decode_cropped(&cropped).unwrap();
//! ```

pub mod image;
pub mod stego;

pub use image::RawImage;
pub use stego::error::StegoError;
pub use stego::fec::RsFramer;
pub use stego::frame::{
    bits_to_bytes, bytes_to_bits, bytes_to_text, decode_frame, encode_frame, text_to_bytes,
    ChecksumFramer, Framer,
};
pub use stego::pipeline::{decode, decode_with_framer, encode, encode_with_framer, DecodeResult};
pub use stego::realign::{decode_cropped, decode_cropped_with_rng, try_decode_at};
pub use stego::tile::{embed_bits_in_tile, extract_bits_from_tile};
pub use stego::{DARK, LIGHT, TILE_CAPACITY_BITS, TILE_SIZE};
