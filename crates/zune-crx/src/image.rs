/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use zune_core::bytestream::ZCursor;
use zune_core::options::DecoderOptions;

use crate::decoder::CrxDecoder;
use crate::encoder::CrxEncoder;
use crate::errors::{CrxDecodeErrors, CrxEncodeErrors};
use crate::header::{ClipRecord, CrxHeader};

/// A fully decoded CRX file
///
/// `pixels` are in [`PixelFormat`](crate::PixelFormat) order, rows as stored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CrxImage {
    pub header: CrxHeader,
    pub clips:  Vec<ClipRecord>,
    pub pixels: Vec<u8>
}

/// Decode a CRX file held in memory
///
/// Any width and height the header can store is accepted.
pub fn decode(bytes: &[u8]) -> Result<CrxImage, CrxDecodeErrors> {
    let options = DecoderOptions::default()
        .set_max_width(usize::from(u16::MAX))
        .set_max_height(usize::from(u16::MAX));

    CrxDecoder::new_with_options(ZCursor::new(bytes), options).decode_image()
}

/// Encode an image using the legacy row order for its format
///
/// 24 bit images are stored bottom row first and 32 bit images top row
/// first. The decoder returns rows as stored, so a 24 bit image comes back
/// from [`decode`] upside down. Use [`CrxEncoder`] with
/// [`RowOrder::TopDown`](crate::RowOrder::TopDown) for an exact round trip.
pub fn encode(image: &CrxImage) -> Result<Vec<u8>, CrxEncodeErrors> {
    let encoder = CrxEncoder::new(&image.pixels, image.header, &image.clips);

    let mut out = Vec::with_capacity(encoder.max_size());
    encoder.encode(&mut out)?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::header::{ClipRecord, CrxHeader, PixelFormat};
    use crate::image::{decode, encode, CrxImage};

    #[test]
    fn bgra_image_survives_a_round_trip() {
        let image = CrxImage {
            header: CrxHeader::new(2, 2, PixelFormat::Bgra32),
            clips:  vec![ClipRecord {
                field_0: 1,
                ..Default::default()
            }],
            pixels: vec![1, 2, 3, 0, 4, 5, 6, 128, 7, 8, 9, 255, 0, 0, 0, 1]
        };

        let decoded = decode(&encode(&image).unwrap()).unwrap();

        assert_eq!(decoded.pixels, image.pixels);
        assert_eq!(decoded.clips, image.clips);
        assert_eq!(decoded.header, image.header.normalized());
    }

    #[test]
    fn widths_past_the_default_limit_decode() {
        let header = CrxHeader::new(16385, 1, PixelFormat::Bgra32);
        let image = CrxImage {
            header,
            clips: vec![],
            pixels: (0..header.pixel_buffer_size()).map(|x| (x % 253) as u8).collect()
        };

        let decoded = decode(&encode(&image).unwrap()).unwrap();

        assert_eq!(decoded.header.width, 16385);
        assert_eq!(decoded.pixels, image.pixels);
    }

    #[test]
    fn legacy_bgr_comes_back_flipped() {
        let image = CrxImage {
            header: CrxHeader::new(1, 2, PixelFormat::Bgr24),
            clips:  vec![],
            pixels: vec![1, 2, 3, 4, 5, 6]
        };

        let decoded = decode(&encode(&image).unwrap()).unwrap();

        assert_eq!(decoded.pixels, [4, 5, 6, 1, 2, 3]);
    }
}
