/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Per row reconstruction routines
//!
//! Every routine writes exactly `current.len()` bytes, one row of
//! `width*components` bytes. `prev_row` is the previously reconstructed row,
//! all zeroes for the first row.

use crate::errors::CrxDecodeErrors;

/// Predict from the pixel to the left, the first pixel is stored raw
pub fn handle_left(raw: &[u8], current: &mut [u8], components: usize) {
    if current.len() < components || raw.len() < current.len() {
        return;
    }
    current[..components].copy_from_slice(&raw[..components]);

    for i in components..current.len() {
        current[i] = raw[i].wrapping_add(current[i - components]);
    }
}

/// Predict from the same byte in the row above
pub fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8]) {
    for ((filt, recon), up) in raw.iter().zip(current.iter_mut()).zip(prev_row) {
        *recon = filt.wrapping_add(*up);
    }
}

/// Predict from the pixel above and to the left, the first pixel is stored raw
pub fn handle_up_left(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    if current.len() < components || raw.len() < current.len() {
        return;
    }
    current[..components].copy_from_slice(&raw[..components]);

    let end = current.len().min(prev_row.len() + components);

    for i in components..end {
        current[i] = raw[i].wrapping_add(prev_row[i - components]);
    }
}

/// Predict from the pixel above and to the right, the last pixel is stored raw
pub fn handle_up_right(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    if current.len() < components || raw.len() < current.len() {
        return;
    }
    let len = current.len();
    let last = len - components;

    for i in 0..last.min(prev_row.len().saturating_sub(components)) {
        current[i] = raw[i].wrapping_add(prev_row[i + components]);
    }
    current[last..].copy_from_slice(&raw[last..len]);
}

/// Run length decoding, one channel plane at a time
///
/// A plane is every `components`-th byte of the row starting at the channel
/// offset. Each literal is stored, when the next source byte repeats it the
/// byte after that is a count of extra copies.
///
/// Returns how many bytes of `raw` were consumed.
pub fn handle_rle(
    raw: &[u8], current: &mut [u8], components: usize, row: usize
) -> Result<usize, CrxDecodeErrors> {
    let width = current.len() / components.max(1);
    let mut src = 0;

    for channel in 0..components {
        let mut position = channel;
        let mut remaining = width;

        while remaining > 0 {
            let value = *raw
                .get(src)
                .ok_or(CrxDecodeErrors::InsufficientData(src + 1, raw.len()))?;
            src += 1;

            current[position] = value;
            position += components;
            remaining -= 1;

            if remaining == 0 {
                break;
            }
            if raw.get(src) == Some(&value) {
                let count = usize::from(
                    *raw.get(src + 1)
                        .ok_or(CrxDecodeErrors::InsufficientData(src + 2, raw.len()))?
                );
                src += 2;

                if count > remaining {
                    return Err(CrxDecodeErrors::RunOverflow(row, count, remaining));
                }
                for _ in 0..count {
                    current[position] = value;
                    position += components;
                }
                remaining -= count;
            }
        }
    }
    Ok(src)
}
