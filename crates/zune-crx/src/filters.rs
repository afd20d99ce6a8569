/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Row filters
//!
//! The inflated payload is a sequence of rows, each a filter tag byte
//! followed by the filtered bytes of that row. Decoding understands all
//! five filters, encoding only ever emits [`FilterMethod::Left`].
use alloc::vec;
use alloc::vec::Vec;

use zune_core::log::trace;

use crate::errors::CrxDecodeErrors;
use crate::filters::de_filter::{
    handle_left, handle_rle, handle_up, handle_up_left, handle_up_right
};
use crate::header::PixelFormat;

pub mod de_filter;

/// Filter tag found at the start of every row
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod {
    /// Delta from the pixel to the left, first pixel raw
    Left,
    /// Delta from the pixel above
    Up,
    /// Delta from the pixel above and to the left, first pixel raw
    UpLeft,
    /// Delta from the pixel above and to the right, last pixel raw
    UpRight,
    /// Per channel run length coding
    Rle
}

impl FilterMethod {
    pub const fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::Left),
            1 => Some(FilterMethod::Up),
            2 => Some(FilterMethod::UpLeft),
            3 => Some(FilterMethod::UpRight),
            4 => Some(FilterMethod::Rle),
            _ => None
        }
    }

    pub const fn to_int(self) -> u8 {
        match self {
            FilterMethod::Left => 0,
            FilterMethod::Up => 1,
            FilterMethod::UpLeft => 2,
            FilterMethod::UpRight => 3,
            FilterMethod::Rle => 4
        }
    }
}

/// Order in which the encoder emits rows
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RowOrder {
    /// First image row first
    TopDown,
    /// Last image row first
    BottomUp
}

impl RowOrder {
    /// The order existing CRX readers expect for a pixel format
    ///
    /// 24 bit images are stored bottom row first, 32 bit ones top row first.
    pub const fn legacy(format: PixelFormat) -> RowOrder {
        match format {
            PixelFormat::Bgr24 => RowOrder::BottomUp,
            PixelFormat::Bgra32 => RowOrder::TopDown
        }
    }
}

/// Reconstruct `height` rows from a filtered row stream into `out`
///
/// Rows land in `out` in stream order. Returns the number of stream bytes
/// consumed, anything after that is unused.
pub fn unfilter_rows(
    stream: &[u8], out: &mut [u8], width: usize, height: usize, components: usize
) -> Result<usize, CrxDecodeErrors> {
    let width_stride = width * components;
    let needed = width_stride * height;

    if out.len() < needed {
        return Err(CrxDecodeErrors::TooSmallOutput(needed, out.len()));
    }

    let zero_row = vec![0_u8; width_stride];
    let mut histogram = [0_usize; 5];

    let mut in_position = 0;
    let mut out_position = 0;

    for row in 0..height {
        let filter_byte = *stream
            .get(in_position)
            .ok_or(CrxDecodeErrors::InsufficientData(in_position + 1, stream.len()))?;
        in_position += 1;

        let filter = FilterMethod::from_int(filter_byte)
            .ok_or(CrxDecodeErrors::UnknownFilter(filter_byte, row))?;

        histogram[usize::from(filter_byte)] += 1;

        // prev holds every row already written, the last of them is the row above
        let (prev, rest) = out.split_at_mut(out_position);
        let current = &mut rest[..width_stride];

        let prev_row: &[u8] = if row == 0 {
            &zero_row
        } else {
            &prev[out_position - width_stride..]
        };
        let raw = &stream[in_position..];

        if filter != FilterMethod::Rle && raw.len() < width_stride {
            return Err(CrxDecodeErrors::InsufficientData(width_stride, raw.len()));
        }

        match filter {
            FilterMethod::Left => handle_left(raw, current, components),
            FilterMethod::Up => handle_up(prev_row, raw, current),
            FilterMethod::UpLeft => handle_up_left(prev_row, raw, current, components),
            FilterMethod::UpRight => handle_up_right(prev_row, raw, current, components),
            FilterMethod::Rle => {
                in_position += handle_rle(raw, current, components, row)?;
            }
        }
        if filter != FilterMethod::Rle {
            in_position += width_stride;
        }
        out_position += width_stride;
    }

    trace!(
        "Filter usage left:{} up:{} up_left:{} up_right:{} rle:{}",
        histogram[0],
        histogram[1],
        histogram[2],
        histogram[3],
        histogram[4]
    );

    Ok(in_position)
}

/// Write one row as a [`FilterMethod::Left`] tagged scanline
pub fn filter_scanline_left(row: &[u8], out: &mut Vec<u8>, components: usize) {
    out.push(FilterMethod::Left.to_int());

    if row.len() < components {
        return;
    }
    out.extend_from_slice(&row[..components]);

    for (current, left) in row[components..].iter().zip(row) {
        out.push(current.wrapping_sub(*left));
    }
}

/// Filter a pixel buffer into a row stream
///
/// Every row is emitted with the left filter, `1 + width*components` bytes
/// per row, in the requested order.
pub fn filter_rows(
    pixels: &[u8], width: usize, height: usize, components: usize, order: RowOrder
) -> Vec<u8> {
    let stride = width * components;
    let mut out = Vec::with_capacity((stride + 1) * height);

    for y in 0..height {
        let row = match order {
            RowOrder::TopDown => y,
            RowOrder::BottomUp => height - 1 - y
        };
        let start = row * stride;

        filter_scanline_left(&pixels[start..start + stride], &mut out, components);
    }
    out
}
