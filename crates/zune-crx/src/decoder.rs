/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteReaderTrait, ZCursor, ZReader};
use zune_core::colorspace::ColorSpace;
use zune_core::log::{trace, warn};
use zune_core::options::DecoderOptions;

use crate::compress::{inflate, inflate_limit};
use crate::constants::CRX_MAGIC;
use crate::container::CrxContainer;
use crate::errors::CrxDecodeErrors;
use crate::filters::unfilter_rows;
use crate::header::{ClipRecord, CrxHeader, PixelFormat};
use crate::image::CrxImage;
use crate::swizzle::abgr_to_bgra_invert_alpha;

/// Check whether the bytes start with the CRX magic
pub fn probe_crx(bytes: &[u8]) -> bool {
    bytes
        .get(..4)
        .map(|magic| magic == CRX_MAGIC.to_le_bytes())
        .unwrap_or(false)
}

/// A CRX decoder
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to read the header, clip table and
/// compressed payload or [`decode`] to return uncompressed pixels
///
/// Pixels come out in [`ColorSpace::BGR`] for 24 bit images and
/// [`ColorSpace::BGRA`] for 32 bit ones, rows in the order they were
/// stored.
///
/// [`decode_headers`]:CrxDecoder::decode_headers
/// [`decode`]:CrxDecoder::decode
pub struct CrxDecoder<T>
where
    T: ZByteReaderTrait
{
    stream:    ZReader<T>,
    options:   DecoderOptions,
    container: Option<CrxContainer>
}

impl<T> CrxDecoder<T>
where
    T: ZByteReaderTrait
{
    /// Create a new decoder with the default options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use zune_core::bytestream::ZCursor;
    /// let mut decoder = zune_crx::CrxDecoder::new(ZCursor::new(b""));
    /// ```
    pub fn new(data: T) -> CrxDecoder<T> {
        CrxDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder that obeys the given limits
    ///
    /// Width and height limits are checked against the header before
    /// anything is inflated. In strict mode bytes left over after the payload
    /// or after the last row are an error instead of a warning.
    ///
    /// # Example
    /// ```
    /// use zune_core::bytestream::ZCursor;
    /// use zune_core::options::DecoderOptions;
    /// use zune_crx::CrxDecoder;
    ///
    /// let options = DecoderOptions::default().set_max_width(1024).set_max_height(1024);
    /// let decoder = CrxDecoder::new_with_options(ZCursor::new(b""), options);
    /// ```
    pub fn new_with_options(data: T, options: DecoderOptions) -> CrxDecoder<T> {
        CrxDecoder {
            stream: ZReader::new(data),
            options,
            container: None
        }
    }

    /// Read the header, clip table and compressed payload
    ///
    /// Calling this more than once does nothing.
    pub fn decode_headers(&mut self) -> Result<(), CrxDecodeErrors> {
        if self.container.is_some() {
            return Ok(());
        }
        let container = CrxContainer::read(&mut self.stream, self.options.strict_mode())?;

        let (width, height) = (
            usize::from(container.header.width),
            usize::from(container.header.height)
        );

        if width > self.options.max_width() {
            return Err(CrxDecodeErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width
            ));
        }
        if height > self.options.max_height() {
            return Err(CrxDecodeErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height
            ));
        }
        self.container = Some(container);

        Ok(())
    }

    /// Decode the image returning the pixels
    pub fn decode(&mut self) -> Result<Vec<u8>, CrxDecodeErrors> {
        self.decode_headers()?;

        let size = self.output_buffer_size().unwrap_or(0);
        let mut output = vec![0; size];

        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode the image into a caller supplied buffer
    ///
    /// The buffer must be at least [`output_buffer_size`](Self::output_buffer_size)
    /// bytes, only that many bytes are written.
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), CrxDecodeErrors> {
        self.decode_headers()?;

        let container = self
            .container
            .as_ref()
            .ok_or(CrxDecodeErrors::GenericStatic("Headers were not decoded"))?;

        let header = &container.header;
        let width = usize::from(header.width);
        let height = usize::from(header.height);
        let pixel_size = header.format.pixel_size();
        let size = header.pixel_buffer_size();

        if pixels.len() < size {
            return Err(CrxDecodeErrors::TooSmallOutput(size, pixels.len()));
        }
        let pixels = &mut pixels[..size];

        let row_stream = inflate(
            &container.payload,
            height * (1 + width * pixel_size),
            inflate_limit(width, height, pixel_size).min(self.options.inflate_get_limit()),
            self.options.inflate_get_confirm_adler()
        )?;

        let used = unfilter_rows(&row_stream, pixels, width, height, pixel_size)?;
        let extra = row_stream.len() - used;

        if extra > 0 {
            if self.options.strict_mode() {
                return Err(CrxDecodeErrors::TrailingData(extra));
            }
            warn!("Ignoring {extra} bytes after the last row");
        }

        if header.format == PixelFormat::Bgra32 {
            abgr_to_bgra_invert_alpha(pixels);
        }
        trace!("Finished decoding image");

        Ok(())
    }

    /// Decode and return the header, clip table and pixels together
    pub fn decode_image(mut self) -> Result<CrxImage, CrxDecodeErrors> {
        let pixels = self.decode()?;

        match self.container {
            Some(container) => Ok(CrxImage {
                header: container.header,
                clips: container.clips,
                pixels
            }),
            None => Err(CrxDecodeErrors::GenericStatic("Headers were not decoded"))
        }
    }

    /// Bytes needed to hold the decoded image
    ///
    /// Returns `None` if headers were not decoded
    pub fn output_buffer_size(&self) -> Option<usize> {
        self.container
            .as_ref()
            .map(|c| c.header.pixel_buffer_size())
    }

    /// The header as read from the file
    ///
    /// Returns `None` if headers were not decoded
    pub fn header(&self) -> Option<&CrxHeader> {
        self.container.as_ref().map(|c| &c.header)
    }

    /// Clip records, empty for version 2 files
    ///
    /// Returns `None` if headers were not decoded
    pub fn clips(&self) -> Option<&[ClipRecord]> {
        self.container.as_ref().map(|c| c.clips.as_slice())
    }

    /// The still compressed payload
    pub fn payload(&self) -> Option<&[u8]> {
        self.container.as_ref().map(|c| c.payload.as_slice())
    }

    /// Image width and height
    ///
    /// Returns `None` if headers were not decoded
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.header()
            .map(|h| (usize::from(h.width), usize::from(h.height)))
    }

    /// Colorspace of the decoded pixels
    ///
    /// Returns `None` if headers were not decoded
    pub fn colorspace(&self) -> Option<ColorSpace> {
        self.header().map(|h| h.format.colorspace())
    }

    /// Always eight bits once headers are decoded
    pub fn bit_depth(&self) -> Option<BitDepth> {
        self.header().map(|_| BitDepth::Eight)
    }
}

impl<'a> CrxDecoder<ZCursor<&'a [u8]>> {
    /// Create a decoder over an in memory file
    pub fn from_bytes(data: &'a [u8]) -> CrxDecoder<ZCursor<&'a [u8]>> {
        CrxDecoder::new(ZCursor::new(data))
    }
}
