/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Zlib adapter for the compressed payload
//!
//! Payloads are plain zlib streams, a two byte header, raw deflate
//! data and an adler32 trailer.
use alloc::vec::Vec;

use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use zune_core::log::trace;
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::errors::CrxDecodeErrors;

/// Smallest output limit handed to the inflater
const MIN_INFLATE_LIMIT: usize = 1 << 16;

/// Inflate a zlib payload
///
/// `size_hint` pre-sizes the output, `limit` caps how large it may grow
/// so that a hostile payload cannot exhaust memory. The adler32 trailer is
/// only verified when `confirm_checksum` is set.
pub fn inflate(
    data: &[u8], size_hint: usize, limit: usize, confirm_checksum: bool
) -> Result<Vec<u8>, CrxDecodeErrors> {
    let options = DeflateOptions::default()
        .set_size_hint(size_hint)
        .set_limit(limit.max(MIN_INFLATE_LIMIT))
        .set_confirm_checksum(confirm_checksum);

    let mut decoder = DeflateDecoder::new_with_options(data, options);
    let inflated = decoder.decode_zlib()?;

    trace!("Inflated {} bytes into {}", data.len(), inflated.len());

    Ok(inflated)
}

/// Deflate bytes into a zlib stream at the best compression level
pub fn deflate(data: &[u8]) -> Vec<u8> {
    let deflated = compress_to_vec_zlib(data, CompressionLevel::BestCompression as u8);

    trace!("Deflated {} bytes into {}", data.len(), deflated.len());

    deflated
}

/// Largest row stream an image of this size can produce
///
/// Every row is a tag byte plus at most three source bytes per output
/// byte, the worst case for runs that never repeat. The result is doubled
/// to leave room for encoders that pad.
pub fn inflate_limit(width: usize, height: usize, pixel_size: usize) -> usize {
    let row = 1_usize.saturating_add(width.saturating_mul(pixel_size).saturating_mul(3));

    row.saturating_mul(height).saturating_mul(2)
}
