// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tesseracore

//! Reed-Solomon framer: error *correction* instead of mere detection.
//!
//! Drop-in [`Framer`] replacement for the default checksum frame. The magic
//! and length prefix stay in the clear (tile scanning needs them to locate
//! candidate frames cheaply); the payload is split into GF(2^8) blocks of
//! `255 - ecc_len` data bytes, each followed by its `ecc_len` parity bytes:
//!
//! ```text
//! [4 bytes] magic 0xDEADBEEF
//! [2 bytes] payload length (big-endian u16)
//! [  ...  ] data chunk ‖ parity, repeated; last chunk shortened
//! ```
//!
//! Each block survives up to `ecc_len / 2` corrupted bytes. The RS
//! arithmetic itself is the `reed-solomon` crate's concern — this module
//! only does the framing around it. Chunk boundaries are recomputed from the
//! length field on decode, so the layout needs no extra bookkeeping bytes.
//!
//! Swapping framers changes the wire format: images encoded with one framer
//! do not decode with the other.

use reed_solomon::{Decoder, Encoder};

use crate::stego::error::StegoError;
use crate::stego::frame::{Framer, MAGIC, MAX_PAYLOAD_BYTES};

/// GF(2^8) Reed-Solomon block size limit.
const RS_BLOCK_LEN: usize = 255;

/// A [`Framer`] that protects the payload with Reed-Solomon parity.
#[derive(Debug, Clone, Copy)]
pub struct RsFramer {
    ecc_len: usize,
}

impl RsFramer {
    /// Create a framer with `ecc_len` parity bytes per block (corrects up to
    /// `ecc_len / 2` byte errors per block).
    ///
    /// # Panics
    /// Panics if `ecc_len` is 0 or leaves no room for data in a 255-byte
    /// GF(2^8) block.
    pub fn new(ecc_len: usize) -> Self {
        assert!(
            ecc_len > 0 && ecc_len < RS_BLOCK_LEN,
            "ecc_len must be in 1..{RS_BLOCK_LEN}"
        );
        Self { ecc_len }
    }

    /// Parity bytes per block.
    pub fn ecc_len(&self) -> usize {
        self.ecc_len
    }

    /// Data bytes per full block.
    fn data_chunk_len(&self) -> usize {
        RS_BLOCK_LEN - self.ecc_len
    }
}

impl Framer for RsFramer {
    fn encode_frame(&self, payload: &[u8]) -> Result<Vec<u8>, StegoError> {
        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(StegoError::MessageTooLarge);
        }

        let chunks = payload.chunks(self.data_chunk_len());
        let mut frame =
            Vec::with_capacity(MAGIC.len() + 2 + payload.len() + chunks.len() * self.ecc_len);
        frame.extend_from_slice(&MAGIC);
        frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());

        let encoder = Encoder::new(self.ecc_len);
        for chunk in chunks {
            let block = encoder.encode(chunk);
            frame.extend_from_slice(&block);
        }
        Ok(frame)
    }

    fn decode_frame(&self, raw: &[u8]) -> Option<Vec<u8>> {
        let rest = raw.strip_prefix(&MAGIC[..])?;
        if rest.len() < 2 {
            return None;
        }

        let len = u16::from_be_bytes([rest[0], rest[1]]) as usize;
        let chunk_len = self.data_chunk_len();
        let n_chunks = (len + chunk_len - 1) / chunk_len;
        if rest.len() < 2 + len + n_chunks * self.ecc_len {
            return None;
        }

        let decoder = Decoder::new(self.ecc_len);
        let mut payload = Vec::with_capacity(len);
        let mut offset = 2;
        let mut remaining = len;
        while remaining > 0 {
            let data_len = remaining.min(chunk_len);
            let block_len = data_len + self.ecc_len;
            let mut block = rest[offset..offset + block_len].to_vec();
            let recovered = decoder.correct(&mut block, None).ok()?;
            payload.extend_from_slice(recovered.data());
            offset += block_len;
            remaining -= data_len;
        }
        Some(payload)
    }
}
