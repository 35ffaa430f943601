// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! Payload frame construction and parsing, plus byte/bit conversion.
//!
//! The frame is the binary container embedded into every tile:
//!
//! ```text
//! [4 bytes] magic 0xDEADBEEF
//! [2 bytes] payload length (big-endian u16)
//! [N bytes] payload (UTF-8 message bytes)
//! [1 byte ] checksum: sum of payload bytes mod 256
//! ```
//!
//! This wire format is fixed — independent implementations must produce
//! byte-identical frames. Parsing never panics and never allocates an error:
//! a tile that carries no message fails the magic/length/checksum checks with
//! overwhelming probability, so "not found" and "corrupted" are the same
//! `None` result.
//!
//! The single-byte checksum misses 1 in 256 random corruptions; the
//! [`RsFramer`](crate::stego::fec::RsFramer) variant trades frame size for
//! actual error *correction* and can be swapped in through the [`Framer`]
//! trait without touching the tile or image layers.

use crate::stego::error::StegoError;

/// Frame magic bytes: 0xDEADBEEF.
pub const MAGIC: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

/// Fixed overhead: magic(4) + length(2) + checksum(1).
pub const FRAME_OVERHEAD: usize = MAGIC.len() + 2 + 1; // 7

/// Maximum payload length, limited by the u16 length field.
pub const MAX_PAYLOAD_BYTES: usize = u16::MAX as usize;

/// The framer seam: wraps payload bytes into a self-delimiting byte frame and
/// recovers them from (possibly padded, possibly corrupted) raw bytes.
///
/// Implementations must treat corruption as an absent result, never a panic:
/// `decode_frame` runs on every tile of every scanned image, and almost all
/// of them carry noise.
pub trait Framer {
    /// Wrap `payload` into a frame.
    ///
    /// # Errors
    /// Returns [`StegoError::MessageTooLarge`] if `payload` exceeds the u16
    /// length field.
    fn encode_frame(&self, payload: &[u8]) -> Result<Vec<u8>, StegoError>;

    /// Recover the payload from raw bytes, which may extend past the frame
    /// (tile extraction always yields the full tile capacity, zero-padded).
    ///
    /// Returns `None` on magic mismatch, truncation, or integrity failure.
    fn decode_frame(&self, raw: &[u8]) -> Option<Vec<u8>>;
}

/// The default framer: magic + u16be length + payload + sum-mod-256 checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChecksumFramer;

impl Framer for ChecksumFramer {
    fn encode_frame(&self, payload: &[u8]) -> Result<Vec<u8>, StegoError> {
        encode_frame(payload)
    }

    fn decode_frame(&self, raw: &[u8]) -> Option<Vec<u8>> {
        decode_frame(raw)
    }
}

/// Sum of all payload bytes, mod 256.
fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Build a checksum frame around `payload`.
///
/// # Errors
/// Returns [`StegoError::MessageTooLarge`] if `payload.len() > 65535`.
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>, StegoError> {
    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(StegoError::MessageTooLarge);
    }

    let mut frame = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    frame.extend_from_slice(payload);
    frame.push(checksum(payload));
    Ok(frame)
}

/// Parse a checksum frame, verifying magic, length and checksum.
///
/// `raw` may be longer than the frame; trailing bytes are ignored. Returns
/// `None` if the magic bytes don't match, fewer than 3 bytes follow the
/// magic, the declared length overruns `raw`, or the checksum mismatches.
pub fn decode_frame(raw: &[u8]) -> Option<Vec<u8>> {
    let rest = raw.strip_prefix(&MAGIC[..])?;

    // At least length(2) + checksum(1).
    if rest.len() < 3 {
        return None;
    }

    let len = u16::from_be_bytes([rest[0], rest[1]]) as usize;
    if rest.len() < 2 + len + 1 {
        return None;
    }

    let payload = &rest[2..2 + len];
    let expected = rest[2 + len];
    if checksum(payload) != expected {
        return None;
    }

    Some(payload.to_vec())
}

// --- Byte/bit codec ---

/// Encode text as UTF-8 bytes.
pub fn text_to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decode UTF-8 bytes back to text. Returns `None` on invalid UTF-8 —
/// extracted tile noise frequently passes the frame checks' weaker filters.
pub fn bytes_to_text(bytes: &[u8]) -> Option<String> {
    String::from_utf8(bytes.to_vec()).ok()
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((bits.len() + 7) / 8);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}
