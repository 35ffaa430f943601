// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! Crop-tolerance integration tests: encode with full tile redundancy,
//! crop at an arbitrary offset, recover via the realignment search.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tessera_core::{decode, decode_cropped_with_rng, encode, RawImage, TILE_SIZE};

fn gray_image(w: u32, h: u32) -> RawImage {
    RawImage::new(w, h, [128, 128, 128, 255].repeat(w as usize * h as usize)).unwrap()
}

/// Crop the `(x, y, w, h)` window out of an image.
fn crop(image: &RawImage, x: u32, y: u32, w: u32, h: u32) -> RawImage {
    let src_w = image.width() as usize;
    let mut pixels = Vec::with_capacity(w as usize * h as usize * 4);
    for row in y..y + h {
        let from = (row as usize * src_w + x as usize) * 4;
        pixels.extend_from_slice(&image.pixels()[from..from + w as usize * 4]);
    }
    RawImage::new(w, h, pixels).unwrap()
}

fn rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

#[test]
fn unaligned_crop_recovers_message() {
    let stego = encode(&gray_image(320, 320), "survives the crop").unwrap();
    let cropped = crop(&stego, 17, 5, 290, 300);

    // The aligned decoder sees a shifted grid and finds nothing.
    assert!(decode(&cropped).is_none());

    let result = decode_cropped_with_rng(&cropped, &mut rng(42)).unwrap();
    assert_eq!(result.message, "survives the crop");
    assert!(result.votes >= 4, "votes {} below quorum", result.votes);
}

#[test]
fn crop_leaving_exactly_four_tiles() {
    // Crop (31, 31, 161, 161) from a 320×320 stego image: surviving aligned
    // tiles anchor at (33, 33) in cropped coordinates, a 2×2 grid — the
    // minimum that still reaches quorum.
    let stego = encode(&gray_image(320, 320), "quorum edge").unwrap();
    let cropped = crop(&stego, 31, 31, 161, 161);

    let result = decode_cropped_with_rng(&cropped, &mut rng(9)).unwrap();
    assert_eq!(result.message, "quorum edge");
    assert_eq!(result.votes, 4);
    assert_eq!(
        result.detected_tiles,
        vec![(33, 33), (97, 33), (33, 97), (97, 97)]
    );
}

#[test]
fn aligned_crop_still_decodes_both_ways() {
    // A crop at a multiple of the tile size keeps the grid at origin (0,0).
    let stego = encode(&gray_image(320, 320), "aligned crop").unwrap();
    let cropped = crop(&stego, TILE_SIZE as u32, 0, 256, 320);

    assert_eq!(decode(&cropped).unwrap().message, "aligned crop");
    let result = decode_cropped_with_rng(&cropped, &mut rng(5)).unwrap();
    assert_eq!(result.message, "aligned crop");
    assert!(result.votes >= 4);
}

#[test]
fn cropped_decode_deterministic_with_seed() {
    let stego = encode(&gray_image(320, 320), "seeded").unwrap();
    let cropped = crop(&stego, 63, 63, 230, 230);

    let a = decode_cropped_with_rng(&cropped, &mut rng(1234));
    let b = decode_cropped_with_rng(&cropped, &mut rng(1234));
    assert_eq!(a, b);
    assert_eq!(a.unwrap().message, "seeded");
}

#[test]
fn crop_below_quorum_is_rejected() {
    // 161×97 leaves a 2×1 grid of aligned tiles — two agreeing tiles are
    // not enough evidence, so the search must come up empty.
    let stego = encode(&gray_image(320, 320), "too few").unwrap();
    let cropped = crop(&stego, 31, 31, 161, 97);

    assert_eq!(decode_cropped_with_rng(&cropped, &mut rng(77)), None);
}
