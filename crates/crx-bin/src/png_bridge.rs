/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Moving pixels between CRX and PNG
//!
//! CRX pixels are blue, green, red (alpha), PNG wants red first.

use std::io::Cursor;

use log::debug;
use png::{BitDepth, ColorType, Transformations};
use zune_crx::PixelFormat;

use crate::errors::CrxToolErrors;

/// Pixels read from a PNG, already in CRX channel order
pub struct BgrPixels {
    pub width:  usize,
    pub height: usize,
    pub format: PixelFormat,
    pub pixels: Vec<u8>
}

/// Swap the first and third channel of every pixel
pub fn swap_red_blue(pixels: &mut [u8], components: usize) {
    for px in pixels.chunks_exact_mut(components) {
        px.swap(0, 2);
    }
}

/// Expand gray (and gray + alpha) pixels to three color channels
fn expand_luma(pixels: &[u8], with_alpha: bool) -> Vec<u8> {
    let (in_size, out_size) = if with_alpha { (2, 4) } else { (1, 3) };
    let mut out = Vec::with_capacity(pixels.len() / in_size * out_size);

    for px in pixels.chunks_exact(in_size) {
        out.extend_from_slice(&[px[0], px[0], px[0]]);

        if with_alpha {
            out.push(px[1]);
        }
    }
    out
}

/// Encode CRX pixels as an 8 bit RGB or RGBA PNG
pub fn encode_png(
    pixels: &[u8], width: usize, height: usize, format: PixelFormat
) -> Result<Vec<u8>, CrxToolErrors> {
    let mut rgb = pixels.to_vec();
    swap_red_blue(&mut rgb, format.pixel_size());

    let color = match format {
        PixelFormat::Bgr24 => ColorType::Rgb,
        PixelFormat::Bgra32 => ColorType::Rgba
    };
    let (w, h) = (
        u32::try_from(width).map_err(|e| e.to_string())?,
        u32::try_from(height).map_err(|e| e.to_string())?
    );

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, w, h);
        encoder.set_color(color);
        encoder.set_depth(BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgb)?;
        writer.finish()?;
    }
    Ok(out)
}

/// Decode a PNG into CRX pixels
///
/// Palettes and low bit depths are expanded, 16 bit samples stripped to 8.
/// Gray images become 24 bit, anything with alpha 32 bit.
pub fn decode_png(data: &[u8]) -> Result<BgrPixels, CrxToolErrors> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    debug!(
        "PNG {}x{} {:?} {:?}",
        info.width, info.height, info.color_type, info.bit_depth
    );

    let (format, mut pixels) = match info.color_type {
        ColorType::Rgb => (PixelFormat::Bgr24, buf),
        ColorType::Rgba => (PixelFormat::Bgra32, buf),
        ColorType::Grayscale => (PixelFormat::Bgr24, expand_luma(&buf, false)),
        ColorType::GrayscaleAlpha => (PixelFormat::Bgra32, expand_luma(&buf, true)),
        other => return Err(CrxToolErrors::UnsupportedPng(other))
    };
    swap_red_blue(&mut pixels, format.pixel_size());

    Ok(BgrPixels {
        width: info.width as usize,
        height: info.height as usize,
        format,
        pixels
    })
}
