// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! Steganographic encoding and decoding pipelines.
//!
//! The engine hides one framed message redundantly in every 64×64 tile of an
//! RGBA image:
//!
//! - [`pipeline::encode`] / [`pipeline::decode`]: grid-aligned embedding and
//!   majority-vote consensus decoding.
//! - [`realign::decode_cropped`]: crop-tolerant decoding that searches for
//!   the tile-grid origin when the image has been cropped.
//! - [`frame::Framer`]: the framing seam — checksum framing by default,
//!   Reed-Solomon ([`fec::RsFramer`]) for error *correction* instead of mere
//!   detection.

pub mod error;
pub mod frame;
pub mod fec;
pub mod tile;
pub mod pipeline;
pub mod realign;

pub use error::StegoError;

/// Tile edge length in pixels. 64 is the sweet spot: big enough to hold a
/// useful frame, small enough that the realignment search stays fast.
pub const TILE_SIZE: usize = 64;

/// Bits one tile can carry (one bit per pixel).
pub const TILE_CAPACITY_BITS: usize = TILE_SIZE * TILE_SIZE;

/// Channels above this value count as "light" for the extreme-pixel rules.
pub const LIGHT: u8 = 240;

/// Channels below this value count as "dark" for the extreme-pixel rules.
pub const DARK: u8 = 15;

pub use pipeline::{
    decode, decode_with_framer, encode, encode_with_framer, DecodeResult,
};
pub use realign::{decode_cropped, decode_cropped_with_rng};
