// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! Grid-aligned encode/decode pipeline with consensus voting.
//!
//! Encoding partitions the image into a `(0,0)`-origin grid of whole 64×64
//! tiles (a trailing partial row/column is left untouched) and embeds the
//! *same* frame into every tile. The full redundancy is what makes cropping
//! survivable: any intact tile alone carries the whole message.
//!
//! Decoding extracts every grid tile independently, parses frames, and
//! tallies the successful messages into a vote. The highest-voted message
//! wins; a tile that carries no valid frame simply contributes no vote.
//!
//! With the `parallel` feature, the per-tile work is mapped across threads:
//! encode writes disjoint tiles, and decode's votes are merged by an ordered
//! sequential reduction, so the winning message never depends on thread
//! scheduling (genuine ties resolve by first-seen raster order either way).

use crate::image::RawImage;
use crate::stego::error::StegoError;
use crate::stego::frame::{self, ChecksumFramer, Framer};
use crate::stego::tile::{embed_bits_in_tile, extract_bits_from_tile};
use crate::stego::{TILE_CAPACITY_BITS, TILE_SIZE};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The outcome of a successful consensus decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    /// The winning message.
    pub message: String,
    /// Number of tiles that decoded to exactly this message.
    pub votes: u32,
    /// Top-left coordinates of the contributing tiles, raster order.
    pub detected_tiles: Vec<(u32, u32)>,
}

/// Top-left corners of all whole tiles on a grid anchored at `(offset_x, offset_y)`.
///
/// Raster order (left-to-right, top-to-bottom), matching the embed order.
pub(crate) fn tile_origins(
    width: usize,
    height: usize,
    offset_x: usize,
    offset_y: usize,
) -> Vec<(usize, usize)> {
    let mut origins = Vec::new();
    let mut y = offset_y;
    while y + TILE_SIZE <= height {
        let mut x = offset_x;
        while x + TILE_SIZE <= width {
            origins.push((x, y));
            x += TILE_SIZE;
        }
        y += TILE_SIZE;
    }
    origins
}

/// Encode `text` into every whole tile of `image` using the default
/// checksum framer. The input buffer is never mutated; a new image is
/// returned.
///
/// # Errors
/// - [`StegoError::ImageTooSmall`] if the image holds no whole 64×64 tile.
/// - [`StegoError::MessageTooLarge`] if the framed message exceeds 4096 bits
///   (`TILE_CAPACITY_BITS`), i.e. a payload longer than ~505 bytes.
pub fn encode(image: &RawImage, text: &str) -> Result<RawImage, StegoError> {
    encode_with_framer(image, text, &ChecksumFramer)
}

/// Encode with a caller-chosen [`Framer`] (e.g. [`RsFramer`](crate::stego::fec::RsFramer)).
pub fn encode_with_framer<F: Framer + Sync>(
    image: &RawImage,
    text: &str,
    framer: &F,
) -> Result<RawImage, StegoError> {
    // 1. Frame the message and convert to bits.
    let frame_bytes = framer.encode_frame(&frame::text_to_bytes(text))?;
    let bits = frame::bytes_to_bits(&frame_bytes);
    if bits.len() > TILE_CAPACITY_BITS {
        return Err(StegoError::MessageTooLarge);
    }

    // 2. Partition into whole tiles from origin (0,0).
    let origins = tile_origins(image.width() as usize, image.height() as usize, 0, 0);
    if origins.is_empty() {
        return Err(StegoError::ImageTooSmall);
    }

    // 3. Embed the same bit sequence into every tile. Each embedded tile is
    //    a pure function of its source pixels, so the map parallelizes.
    let embedded = embed_all_tiles(image, &origins, &bits)?;

    // 4. Assemble the output image; tiles occupy disjoint regions.
    let mut out = image.clone();
    for ((x, y), tile) in origins.into_iter().zip(embedded) {
        out.paste_tile(x, y, TILE_SIZE, &tile);
    }
    Ok(out)
}

#[cfg(feature = "parallel")]
fn embed_all_tiles(
    image: &RawImage,
    origins: &[(usize, usize)],
    bits: &[u8],
) -> Result<Vec<Vec<u8>>, StegoError> {
    origins
        .par_iter()
        .map(|&(x, y)| {
            let tile = image.copy_tile(x, y, TILE_SIZE);
            embed_bits_in_tile(&tile, TILE_SIZE, TILE_SIZE, bits)
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn embed_all_tiles(
    image: &RawImage,
    origins: &[(usize, usize)],
    bits: &[u8],
) -> Result<Vec<Vec<u8>>, StegoError> {
    origins
        .iter()
        .map(|&(x, y)| {
            let tile = image.copy_tile(x, y, TILE_SIZE);
            embed_bits_in_tile(&tile, TILE_SIZE, TILE_SIZE, bits)
        })
        .collect()
}

/// Attempt to decode one tile with top-left `(x, y)`.
///
/// Extracts the full tile capacity, packs to bytes, parses the frame and
/// decodes UTF-8. Any failure along the way yields `None` — the normal
/// outcome for a tile carrying no message.
pub(crate) fn decode_tile_at<F: Framer>(
    image: &RawImage,
    framer: &F,
    x: usize,
    y: usize,
) -> Option<String> {
    let tile = image.copy_tile(x, y, TILE_SIZE);
    let bits = extract_bits_from_tile(&tile, TILE_SIZE, TILE_SIZE, TILE_CAPACITY_BITS);
    let raw = frame::bits_to_bytes(&bits);
    let payload = framer.decode_frame(&raw)?;
    frame::bytes_to_text(&payload)
}

/// Decode `image` on the `(0,0)`-anchored tile grid using the default
/// checksum framer.
///
/// Returns `None` if no tile yields a valid message; otherwise the
/// highest-voted message with its vote count and contributing tiles.
/// Fully deterministic.
pub fn decode(image: &RawImage) -> Option<DecodeResult> {
    decode_with_framer(image, &ChecksumFramer)
}

/// Decode with a caller-chosen [`Framer`].
pub fn decode_with_framer<F: Framer + Sync>(image: &RawImage, framer: &F) -> Option<DecodeResult> {
    let origins = tile_origins(image.width() as usize, image.height() as usize, 0, 0);
    let hits = decode_all_tiles(image, framer, &origins);
    tally_votes(hits)
}

#[cfg(feature = "parallel")]
fn decode_all_tiles<F: Framer + Sync>(
    image: &RawImage,
    framer: &F,
    origins: &[(usize, usize)],
) -> Vec<((u32, u32), String)> {
    // Collect preserves input order, so the later tally sees tiles in the
    // same raster order as the serial path.
    origins
        .par_iter()
        .filter_map(|&(x, y)| {
            decode_tile_at(image, framer, x, y).map(|msg| ((x as u32, y as u32), msg))
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn decode_all_tiles<F: Framer + Sync>(
    image: &RawImage,
    framer: &F,
    origins: &[(usize, usize)],
) -> Vec<((u32, u32), String)> {
    origins
        .iter()
        .filter_map(|&(x, y)| {
            decode_tile_at(image, framer, x, y).map(|msg| ((x as u32, y as u32), msg))
        })
        .collect()
}

/// Tally per-tile messages into a consensus vote.
///
/// First-seen order is preserved so that a genuine tie resolves
/// deterministically to the message encountered first in raster order.
pub(crate) fn tally_votes(hits: Vec<((u32, u32), String)>) -> Option<DecodeResult> {
    let mut tally: Vec<DecodeResult> = Vec::new();
    for ((x, y), message) in hits {
        match tally.iter_mut().find(|entry| entry.message == message) {
            Some(entry) => {
                entry.votes += 1;
                entry.detected_tiles.push((x, y));
            }
            None => tally.push(DecodeResult {
                message,
                votes: 1,
                detected_tiles: vec![(x, y)],
            }),
        }
    }

    // Strictly-greater comparison keeps the earliest entry on ties.
    let mut best: Option<DecodeResult> = None;
    for entry in tally {
        match &best {
            Some(b) if entry.votes <= b.votes => {}
            _ => best = Some(entry),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_image(w: u32, h: u32) -> RawImage {
        RawImage::new(w, h, [128, 128, 128, 255].repeat(w as usize * h as usize)).unwrap()
    }

    #[test]
    fn tile_origins_whole_tiles_only() {
        assert_eq!(tile_origins(128, 128, 0, 0), vec![(0, 0), (64, 0), (0, 64), (64, 64)]);
        // Trailing 63-pixel strip yields no extra tiles.
        assert_eq!(tile_origins(191, 64, 0, 0), vec![(0, 0), (64, 0)]);
        assert_eq!(tile_origins(63, 63, 0, 0), Vec::<(usize, usize)>::new());
        // Offset grids shift the anchor.
        assert_eq!(tile_origins(128, 64, 10, 0), vec![(10, 0)]);
    }

    #[test]
    fn roundtrip_uniform_gray() {
        let img = gray_image(128, 128);
        let stego = encode(&img, "Hello").unwrap();
        let result = decode(&stego).unwrap();
        assert_eq!(result.message, "Hello");
        assert_eq!(result.votes, 4);
        assert_eq!(result.detected_tiles, vec![(0, 0), (64, 0), (0, 64), (64, 64)]);
    }

    #[test]
    fn roundtrip_empty_message() {
        let img = gray_image(128, 128);
        let stego = encode(&img, "").unwrap();
        let result = decode(&stego).unwrap();
        assert_eq!(result.message, "");
        assert_eq!(result.votes, 4);
    }

    #[test]
    fn encode_does_not_mutate_input() {
        let img = gray_image(64, 64);
        let before = img.clone();
        let _ = encode(&img, "immutability").unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn encode_leaves_partial_strips_untouched() {
        let img = gray_image(100, 64);
        let stego = encode(&img, "strip").unwrap();
        // Columns 64..100 lie outside the single whole tile.
        let w = 100usize;
        for y in 0..64usize {
            let from = (y * w + 64) * 4;
            let to = (y * w + 100) * 4;
            assert_eq!(&stego.pixels()[from..to], &img.pixels()[from..to]);
        }
    }

    #[test]
    fn image_without_whole_tile_rejected() {
        let img = gray_image(63, 200);
        assert!(matches!(encode(&img, "x"), Err(StegoError::ImageTooSmall)));
    }

    #[test]
    fn message_over_tile_capacity_rejected() {
        let img = gray_image(64, 64);
        // Frame overhead is 7 bytes; (505 + 7) * 8 = 4096 bits fits exactly,
        // one more byte overflows.
        let fits = "x".repeat(505);
        assert!(encode(&img, &fits).is_ok());
        let overflow = "x".repeat(506);
        assert!(matches!(encode(&img, &overflow), Err(StegoError::MessageTooLarge)));
    }

    #[test]
    fn decode_plain_image_finds_nothing() {
        let img = gray_image(128, 128);
        assert_eq!(decode(&img), None);
    }

    #[test]
    fn decode_is_deterministic() {
        let img = gray_image(192, 128);
        let stego = encode(&img, "repeatable").unwrap();
        let a = decode(&stego).unwrap();
        let b = decode(&stego).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tally_majority_wins() {
        let hits = vec![
            ((0, 0), "a".to_string()),
            ((64, 0), "b".to_string()),
            ((0, 64), "b".to_string()),
        ];
        let result = tally_votes(hits).unwrap();
        assert_eq!(result.message, "b");
        assert_eq!(result.votes, 2);
        assert_eq!(result.detected_tiles, vec![(64, 0), (0, 64)]);
    }

    #[test]
    fn tally_tie_breaks_first_seen() {
        let hits = vec![
            ((0, 0), "first".to_string()),
            ((64, 0), "second".to_string()),
            ((0, 64), "second".to_string()),
            ((64, 64), "first".to_string()),
        ];
        assert_eq!(tally_votes(hits).unwrap().message, "first");
    }

    #[test]
    fn tally_empty_is_none() {
        assert_eq!(tally_votes(Vec::new()), None);
    }
}
