/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::borrow::Cow;

use zune_core::bytestream::ZByteWriterTrait;
use zune_core::log::trace;
use zune_core::options::EncoderOptions;

use crate::compress::deflate;
use crate::constants::{CRX_CLIP_RECORD_SIZE, CRX_HEADER_SIZE};
use crate::container::write_container;
use crate::errors::CrxEncodeErrors;
use crate::filters::{filter_rows, RowOrder};
use crate::header::{ClipRecord, CrxHeader, PixelFormat};
use crate::swizzle::bgra_to_abgr_invert_alpha;

/// A CRX encoder
///
/// Pixels are expected in blue, green, red order for 24 bit images and
/// blue, green, red, alpha for 32 bit ones, the same layout
/// [`CrxDecoder`](crate::CrxDecoder) produces.
///
/// # Example
/// - Encode a 16 by 16 BGRA image
///
/// ```
/// use zune_crx::{CrxEncoder, CrxEncodeErrors, CrxHeader, PixelFormat};
///
/// fn main() -> Result<(), CrxEncodeErrors> {
///     let pixels = vec![127_u8; 16 * 16 * 4];
///     let header = CrxHeader::new(16, 16, PixelFormat::Bgra32);
///
///     let encoder = CrxEncoder::new(&pixels, header, &[]);
///     let mut sink: Vec<u8> = vec![];
///     encoder.encode(&mut sink)?;
///     Ok(())
/// }
/// ```
pub struct CrxEncoder<'a> {
    pixel_data: &'a [u8],
    header:     CrxHeader,
    clips:      &'a [ClipRecord],
    row_order:  Option<RowOrder>
}

impl<'a> CrxEncoder<'a> {
    /// Create an encoder for pixels described by `header`
    ///
    /// # Arguments
    /// - data: Pixel data, size must be equal to `width*height*pixel_size`
    /// - header: Written as is apart from the explicit length flag
    /// - clips: Only stored for version 3 headers
    pub const fn new(
        data: &'a [u8], header: CrxHeader, clips: &'a [ClipRecord]
    ) -> CrxEncoder<'a> {
        CrxEncoder {
            pixel_data: data,
            header,
            clips,
            row_order: None
        }
    }

    /// Create an encoder with a fresh version 3 header and no clip records
    ///
    /// The colorspace must be [`BGR`](zune_core::colorspace::ColorSpace::BGR)
    /// or [`BGRA`](zune_core::colorspace::ColorSpace::BGRA), width and height
    /// must fit in 16 bits.
    pub fn from_options(
        data: &'a [u8], options: EncoderOptions
    ) -> Result<CrxEncoder<'a>, CrxEncodeErrors> {
        let format = PixelFormat::from_colorspace(options.colorspace())?;

        let width = u16::try_from(options.width())
            .map_err(|_| CrxEncodeErrors::ValueOutOfRange("width", options.width() as i64))?;
        let height = u16::try_from(options.height())
            .map_err(|_| CrxEncodeErrors::ValueOutOfRange("height", options.height() as i64))?;

        Ok(CrxEncoder::new(data, CrxHeader::new(width, height, format), &[]))
    }

    /// Override the order rows are stored in
    ///
    /// By default 24 bit images are written bottom row first and 32 bit
    /// images top row first, see [`RowOrder::legacy`]
    pub fn set_row_order(&mut self, order: RowOrder) {
        self.row_order = Some(order);
    }

    pub fn row_order(&self) -> RowOrder {
        self.row_order
            .unwrap_or_else(|| RowOrder::legacy(self.header.format))
    }

    /// Upper bound for the size of the encoded file
    pub fn max_size(&self) -> usize {
        let header = self.header.normalized();
        let rows = usize::from(header.height)
            * (1 + usize::from(header.width) * header.format.pixel_size());
        // zlib's compressBound plus room for a stored block header
        let payload = rows + (rows >> 12) + (rows >> 14) + (rows >> 25) + 13 + 5;

        let clips = if header.has_clip_table() {
            4 + self.clips.len() * CRX_CLIP_RECORD_SIZE
        } else {
            0
        };
        CRX_HEADER_SIZE + clips + 4 + payload
    }

    /// Encode the image into `sink`
    ///
    /// # Returns
    /// - Ok(size): Bytes written
    /// - Err: The error encountered during encoding
    pub fn encode<T: ZByteWriterTrait>(&self, sink: T) -> Result<usize, CrxEncodeErrors> {
        self.header.check_encodable()?;

        let width = usize::from(self.header.width);
        let height = usize::from(self.header.height);
        let pixel_size = self.header.format.pixel_size();
        let expected = self.header.pixel_buffer_size();

        if self.pixel_data.len() != expected {
            return Err(CrxEncodeErrors::WrongInputSize(
                expected,
                self.pixel_data.len()
            ));
        }

        let pixels = match self.header.format {
            PixelFormat::Bgr24 => Cow::Borrowed(self.pixel_data),
            PixelFormat::Bgra32 => {
                let mut stored = self.pixel_data.to_vec();
                bgra_to_abgr_invert_alpha(&mut stored);
                Cow::Owned(stored)
            }
        };

        let row_order = self.row_order();
        let row_stream = filter_rows(&pixels, width, height, pixel_size, row_order);
        let payload = deflate(&row_stream);

        trace!("Row order: {row_order:?}");
        trace!("Row stream: {} bytes", row_stream.len());

        write_container(&self.header, self.clips, &payload, sink)
    }
}

#[cfg(test)]
mod tests {
    use zune_core::bit_depth::BitDepth;
    use zune_core::colorspace::ColorSpace;
    use zune_core::options::EncoderOptions;

    use crate::compress::inflate;
    use crate::container::CrxContainer;
    use crate::encoder::CrxEncoder;
    use crate::errors::CrxEncodeErrors;
    use crate::filters::RowOrder;
    use crate::header::{CrxHeader, PixelFormat};

    #[test]
    fn emits_left_filtered_rows() {
        let pixels = [1, 2, 3, 4, 6, 8];
        let header = CrxHeader::new(2, 1, PixelFormat::Bgr24);

        let mut out: Vec<u8> = vec![];
        CrxEncoder::new(&pixels, header, &[])
            .encode(&mut out)
            .unwrap();

        let container = CrxContainer::parse(&out).unwrap();
        let rows = inflate(&container.payload, 7, 7, true).unwrap();

        assert_eq!(rows, [0, 1, 2, 3, 3, 4, 5]);
    }

    #[test]
    fn alpha_is_stored_inverted_first() {
        let pixels = [10, 20, 30, 255];
        let header = CrxHeader::new(1, 1, PixelFormat::Bgra32);

        let mut out: Vec<u8> = vec![];
        CrxEncoder::new(&pixels, header, &[])
            .encode(&mut out)
            .unwrap();

        let container = CrxContainer::parse(&out).unwrap();
        let rows = inflate(&container.payload, 5, 5, true).unwrap();

        assert_eq!(rows, [0, 0, 10, 20, 30]);
    }

    #[test]
    fn wrong_pixel_count_is_rejected() {
        let header = CrxHeader::new(2, 2, PixelFormat::Bgr24);

        assert!(matches!(
            CrxEncoder::new(&[0; 11], header, &[]).encode(&mut Vec::<u8>::new()),
            Err(CrxEncodeErrors::WrongInputSize(12, 11))
        ));
    }

    #[test]
    fn bad_header_is_rejected() {
        let mut header = CrxHeader::new(1, 1, PixelFormat::Bgr24);
        header.version = 4;

        assert!(matches!(
            CrxEncoder::new(&[0; 3], header, &[]).encode(&mut Vec::<u8>::new()),
            Err(CrxEncodeErrors::UnsupportedVersion(4))
        ));
    }

    #[test]
    fn default_row_order_is_legacy() {
        let bgr = CrxHeader::new(1, 1, PixelFormat::Bgr24);
        let mut encoder = CrxEncoder::new(&[], bgr, &[]);

        assert_eq!(encoder.row_order(), RowOrder::BottomUp);
        encoder.set_row_order(RowOrder::TopDown);
        assert_eq!(encoder.row_order(), RowOrder::TopDown);
    }

    #[test]
    fn options_map_to_header() {
        let pixels = [0; 3 * 5 * 4];
        let options = EncoderOptions::new(3, 5, ColorSpace::BGRA, BitDepth::Eight);
        let encoder = CrxEncoder::from_options(&pixels, options).unwrap();

        let mut out: Vec<u8> = vec![];
        let written = encoder.encode(&mut out).unwrap();

        assert_eq!(written, out.len());
        assert!(written <= encoder.max_size());

        let header = CrxContainer::parse(&out).unwrap().header;
        assert_eq!((header.width, header.height), (3, 5));
        assert_eq!(header.format, PixelFormat::Bgra32);
    }

    #[test]
    fn options_reject_rgb_and_wide_images() {
        let rgb = EncoderOptions::new(1, 1, ColorSpace::RGB, BitDepth::Eight);
        assert!(matches!(
            CrxEncoder::from_options(&[], rgb),
            Err(CrxEncodeErrors::UnsupportedColorspace(ColorSpace::RGB, _))
        ));

        let wide = EncoderOptions::new(70000, 1, ColorSpace::BGR, BitDepth::Eight);
        assert!(matches!(
            CrxEncoder::from_options(&[], wide),
            Err(CrxEncodeErrors::ValueOutOfRange("width", 70000))
        ));
    }
}
