// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! Per-tile bit embedding and extraction.
//!
//! Embeds one bit per pixel in raster order using a pixel-adaptive policy:
//! the bit lands in the brightest of R, G, B (changing the dominant channel
//! by ±1–2 is the least visible), with a safety override for near-white
//! pixels and a wider bit position for extreme (near-black / near-white)
//! pixels where the LSB alone is too fragile.
//!
//! # Channel-selection asymmetry
//!
//! Embedding *changes* the pixel, so the extractor cannot simply re-run the
//! embedder's argmax: on an all-bright pixel the write may demote the
//! selected channel below its siblings. The extractor therefore infers the
//! likely original selection — on all-bright pixels it picks the smallest
//! channel below 253 instead of the largest. The two rules are a matched
//! pair; changing either side alone makes previously encoded images
//! undecodable. Keep them in sync with the wire format.

use crate::image::BYTES_PER_PIXEL;
use crate::stego::error::StegoError;
use crate::stego::{DARK, LIGHT};

/// Channel values above this are never selected for embedding: writing bit
/// position 1 can add 2, and 253 + 2 still avoids overflow.
const NEAR_MAX: u8 = 253;

/// The safety override kicks in when the selected channel of an all-bright
/// pixel exceeds this.
const SAFE_LIMIT: u8 = 250;

fn set_bit(value: u8, position: u8, bit: u8) -> u8 {
    if bit == 1 {
        value | (1 << position)
    } else {
        value & !(1 << position)
    }
}

fn get_bit(value: u8, position: u8) -> u8 {
    (value >> position) & 1
}

/// All three channels below [`DARK`] or all three above [`LIGHT`].
fn is_extreme(r: u8, g: u8, b: u8) -> bool {
    (r < DARK && g < DARK && b < DARK) || (r > LIGHT && g > LIGHT && b > LIGHT)
}

/// Bit position within the selected channel: extreme pixels use position 1,
/// everything else the LSB.
fn bit_position(r: u8, g: u8, b: u8) -> u8 {
    if is_extreme(r, g, b) {
        1
    } else {
        0
    }
}

/// Embed-side channel selection: argmax over (R, G, B), ties favoring the
/// earlier channel.
fn brightest_channel(rgb: [u8; 3]) -> usize {
    let mut sel = 0;
    if rgb[1] > rgb[sel] {
        sel = 1;
    }
    if rgb[2] > rgb[sel] {
        sel = 2;
    }
    sel
}

/// Near-white safety override, shared by embed and extract: when all
/// channels exceed [`LIGHT`] and the current selection exceeds
/// [`SAFE_LIMIT`], redirect to the first channel below [`SAFE_LIMIT`]
/// (if any) to avoid clipping at 255.
fn safety_override(rgb: [u8; 3], sel: usize) -> usize {
    if rgb.iter().all(|&c| c > LIGHT) && rgb[sel] > SAFE_LIMIT {
        if let Some(safe) = rgb.iter().position(|&c| c < SAFE_LIMIT) {
            return safe;
        }
    }
    sel
}

/// Extract-side channel selection. For all-bright pixels, pick the
/// smallest-valued channel below [`NEAR_MAX`] (tie → R, G, B order); if every
/// channel is at 253+, fall back to the numerically smallest. Otherwise the
/// embedder's argmax still holds.
fn likely_embedded_channel(rgb: [u8; 3]) -> usize {
    if rgb.iter().all(|&c| c > LIGHT) {
        let mut best: Option<usize> = None;
        for (idx, &val) in rgb.iter().enumerate() {
            if val < NEAR_MAX && best.map_or(true, |b| val < rgb[b]) {
                best = Some(idx);
            }
        }
        best.unwrap_or_else(|| {
            let mut sel = 0;
            if rgb[1] < rgb[sel] {
                sel = 1;
            }
            if rgb[2] < rgb[sel] {
                sel = 2;
            }
            sel
        })
    } else {
        brightest_channel(rgb)
    }
}

/// Embed `bits` into a copy of `tile` (a `width × height` RGBA block), one
/// bit per pixel in raster order, stopping once the bits are exhausted.
///
/// # Errors
/// Returns [`StegoError::MessageTooLarge`] if `bits.len()` exceeds the pixel
/// count `width * height`.
pub fn embed_bits_in_tile(
    tile: &[u8],
    width: usize,
    height: usize,
    bits: &[u8],
) -> Result<Vec<u8>, StegoError> {
    debug_assert_eq!(tile.len(), width * height * BYTES_PER_PIXEL);

    if bits.len() > width * height {
        return Err(StegoError::MessageTooLarge);
    }

    let mut result = tile.to_vec();
    for (bit_idx, &bit) in bits.iter().enumerate() {
        let px = bit_idx * BYTES_PER_PIXEL;
        let rgb = [result[px], result[px + 1], result[px + 2]];

        let sel = safety_override(rgb, brightest_channel(rgb));
        let pos = bit_position(rgb[0], rgb[1], rgb[2]);
        result[px + sel] = set_bit(result[px + sel], pos, bit);
    }
    Ok(result)
}

/// Extract up to `max_bits` bits from a `width × height` RGBA block, raster
/// order, mirroring the embed policy via the asymmetric channel inference.
pub fn extract_bits_from_tile(
    tile: &[u8],
    width: usize,
    height: usize,
    max_bits: usize,
) -> Vec<u8> {
    debug_assert_eq!(tile.len(), width * height * BYTES_PER_PIXEL);

    let count = max_bits.min(width * height);
    let mut bits = Vec::with_capacity(count);
    for bit_idx in 0..count {
        let px = bit_idx * BYTES_PER_PIXEL;
        let rgb = [tile[px], tile[px + 1], tile[px + 2]];

        let sel = safety_override(rgb, likely_embedded_channel(rgb));
        let pos = bit_position(rgb[0], rgb[1], rgb[2]);
        bits.push(get_bit(tile[px + sel], pos));
    }
    bits
}
