/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Fixed header and clip record layout
//!
//! ```text
//! offset  size  field
//! 0       4     magic `CRXG`
//! 4       2     inner_x (signed)
//! 6       2     inner_y (signed)
//! 8       2     width
//! 10      2     height
//! 12      2     version            (2 or 3)
//! 14      2     flags              (bit0..3 compression mode <= 1, bit4 explicit length)
//! 16      2     bpp                (0 = 24 bit, 1 = 32 bit)
//! 18      2     unknown
//! ```
//!
//! Everything is little endian. `inner_x`, `inner_y`, `unknown` and the clip
//! record fields are carried through untouched, their meaning is not known.

use zune_core::bytestream::{ZByteReaderTrait, ZByteWriterTrait, ZReader, ZWriter};
use zune_core::colorspace::ColorSpace;

use crate::constants::{
    CRX_CLIP_TABLE_VERSION, CRX_COMPRESSION_MASK, CRX_EXPLICIT_LENGTH_FLAG, CRX_MAGIC,
    CRX_MAX_COMPRESSION_MODE
};
use crate::errors::{CrxDecodeErrors, CrxEncodeErrors};

const SUPPORTED_COLORSPACES: [ColorSpace; 2] = [ColorSpace::BGR, ColorSpace::BGRA];

/// Pixel layouts a CRX image can carry
///
/// The header stores this as its `bpp` field, which is a selector
/// and not a bit count.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    /// `bpp == 0`, three bytes per pixel in blue, green, red order
    #[default]
    Bgr24,
    /// `bpp == 1`, four bytes per pixel in blue, green, red, alpha order
    Bgra32
}

impl PixelFormat {
    pub const fn from_bpp(bpp: u16) -> Option<PixelFormat> {
        match bpp {
            0 => Some(PixelFormat::Bgr24),
            1 => Some(PixelFormat::Bgra32),
            _ => None
        }
    }

    pub const fn to_bpp(self) -> u16 {
        match self {
            PixelFormat::Bgr24 => 0,
            PixelFormat::Bgra32 => 1
        }
    }

    /// Bytes making up one pixel
    pub const fn pixel_size(self) -> usize {
        match self {
            PixelFormat::Bgr24 => 3,
            PixelFormat::Bgra32 => 4
        }
    }

    /// Colorspace of decoded pixels
    pub const fn colorspace(self) -> ColorSpace {
        match self {
            PixelFormat::Bgr24 => ColorSpace::BGR,
            PixelFormat::Bgra32 => ColorSpace::BGRA
        }
    }

    /// Map a colorspace to the pixel format that stores it
    ///
    /// Only [`ColorSpace::BGR`] and [`ColorSpace::BGRA`] can be stored
    pub fn from_colorspace(colorspace: ColorSpace) -> Result<PixelFormat, CrxEncodeErrors> {
        match colorspace {
            ColorSpace::BGR => Ok(PixelFormat::Bgr24),
            ColorSpace::BGRA => Ok(PixelFormat::Bgra32),
            _ => Err(CrxEncodeErrors::UnsupportedColorspace(
                colorspace,
                &SUPPORTED_COLORSPACES
            ))
        }
    }
}

/// The fixed 20 byte CRX header
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CrxHeader {
    pub inner_x: i16,
    pub inner_y: i16,
    pub width:   u16,
    pub height:  u16,
    pub version: u16,
    pub flags:   u16,
    pub format:  PixelFormat,
    pub unknown: u16
}

impl Default for CrxHeader {
    fn default() -> Self {
        CrxHeader::new(0, 0, PixelFormat::Bgr24)
    }
}

impl CrxHeader {
    /// Create a version 3 header for an image of the given size
    ///
    /// Opaque fields start zeroed
    pub const fn new(width: u16, height: u16, format: PixelFormat) -> CrxHeader {
        CrxHeader {
            inner_x: 0,
            inner_y: 0,
            width,
            height,
            version: CRX_CLIP_TABLE_VERSION,
            flags: 0,
            format,
            unknown: 0
        }
    }

    /// Whether a clip table follows the header
    pub const fn has_clip_table(&self) -> bool {
        self.version >= CRX_CLIP_TABLE_VERSION
    }

    /// Whether a u32 length precedes the compressed payload
    pub const fn has_explicit_length(&self) -> bool {
        (self.flags & CRX_EXPLICIT_LENGTH_FLAG) != 0
    }

    pub const fn compression_mode(&self) -> u16 {
        self.flags & CRX_COMPRESSION_MASK
    }

    /// Bytes needed for the decoded pixels, `width*height*pixel_size`
    pub const fn pixel_buffer_size(&self) -> usize {
        (self.width as usize) * (self.height as usize) * self.format.pixel_size()
    }

    /// The header as it will be written
    ///
    /// Containers with a clip table always get explicit length framing.
    pub const fn normalized(&self) -> CrxHeader {
        let mut header = *self;

        if header.has_clip_table() {
            header.flags |= CRX_EXPLICIT_LENGTH_FLAG;
        }
        header
    }

    /// Check the fields an encoder cannot make sense of
    pub fn check_encodable(&self) -> Result<(), CrxEncodeErrors> {
        if self.version != 2 && self.version != 3 {
            return Err(CrxEncodeErrors::UnsupportedVersion(self.version));
        }
        if self.compression_mode() > CRX_MAX_COMPRESSION_MODE {
            return Err(CrxEncodeErrors::UnsupportedFlags(self.flags));
        }
        Ok(())
    }

    /// Read and validate the magic and header fields
    pub fn read<T: ZByteReaderTrait>(stream: &mut ZReader<T>) -> Result<CrxHeader, CrxDecodeErrors> {
        let magic = stream.get_u32_le_err()?;

        if magic != CRX_MAGIC {
            return Err(CrxDecodeErrors::WrongMagicBytes(magic));
        }

        let inner_x = stream.get_u16_le_err()? as i16;
        let inner_y = stream.get_u16_le_err()? as i16;
        let width = stream.get_u16_le_err()?;
        let height = stream.get_u16_le_err()?;
        let version = stream.get_u16_le_err()?;
        let flags = stream.get_u16_le_err()?;
        let bpp = stream.get_u16_le_err()?;
        let unknown = stream.get_u16_le_err()?;

        if version != 2 && version != 3 {
            return Err(CrxDecodeErrors::UnsupportedVersion(version));
        }
        if (flags & CRX_COMPRESSION_MASK) > CRX_MAX_COMPRESSION_MODE {
            return Err(CrxDecodeErrors::UnsupportedFlags(flags));
        }
        let format = PixelFormat::from_bpp(bpp).ok_or(CrxDecodeErrors::UnsupportedBpp(bpp))?;

        Ok(CrxHeader {
            inner_x,
            inner_y,
            width,
            height,
            version,
            flags,
            format,
            unknown
        })
    }

    /// Write the magic and header fields exactly as they are
    pub fn write<T: ZByteWriterTrait>(&self, writer: &mut ZWriter<T>) -> Result<(), CrxEncodeErrors> {
        writer.write_u32_le_err(CRX_MAGIC)?;
        writer.write_u16_le_err(self.inner_x as u16)?;
        writer.write_u16_le_err(self.inner_y as u16)?;
        writer.write_u16_le_err(self.width)?;
        writer.write_u16_le_err(self.height)?;
        writer.write_u16_le_err(self.version)?;
        writer.write_u16_le_err(self.flags)?;
        writer.write_u16_le_err(self.format.to_bpp())?;
        writer.write_u16_le_err(self.unknown)?;

        Ok(())
    }
}

/// One opaque 16 byte clip table entry
///
/// Fields are named after their byte offset inside the record.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ClipRecord {
    pub field_0: i32,
    pub field_4: i16,
    pub field_6: i16,
    pub field_8: i16,
    pub field_a: i16,
    pub field_c: i16,
    pub field_e: i16
}

impl ClipRecord {
    pub fn read<T: ZByteReaderTrait>(stream: &mut ZReader<T>) -> Result<ClipRecord, CrxDecodeErrors> {
        Ok(ClipRecord {
            field_0: stream.get_u32_le_err()? as i32,
            field_4: stream.get_u16_le_err()? as i16,
            field_6: stream.get_u16_le_err()? as i16,
            field_8: stream.get_u16_le_err()? as i16,
            field_a: stream.get_u16_le_err()? as i16,
            field_c: stream.get_u16_le_err()? as i16,
            field_e: stream.get_u16_le_err()? as i16
        })
    }

    pub fn write<T: ZByteWriterTrait>(&self, writer: &mut ZWriter<T>) -> Result<(), CrxEncodeErrors> {
        writer.write_u32_le_err(self.field_0 as u32)?;
        writer.write_u16_le_err(self.field_4 as u16)?;
        writer.write_u16_le_err(self.field_6 as u16)?;
        writer.write_u16_le_err(self.field_8 as u16)?;
        writer.write_u16_le_err(self.field_a as u16)?;
        writer.write_u16_le_err(self.field_c as u16)?;
        writer.write_u16_le_err(self.field_e as u16)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use zune_core::bytestream::{ZCursor, ZReader, ZWriter};
    use zune_core::colorspace::ColorSpace;

    use crate::constants::CRX_HEADER_SIZE;
    use crate::errors::CrxDecodeErrors;
    use crate::header::{CrxHeader, PixelFormat};

    fn raw_header(version: u16, flags: u16, bpp: u16) -> Vec<u8> {
        let mut bytes = b"CRXG".to_vec();

        for field in [0xFFFE_u16, 7, 64, 32, version, flags, bpp, 0xBEEF] {
            bytes.extend_from_slice(&field.to_le_bytes());
        }
        bytes
    }

    fn read(bytes: &[u8]) -> Result<CrxHeader, CrxDecodeErrors> {
        CrxHeader::read(&mut ZReader::new(ZCursor::new(bytes)))
    }

    #[test]
    fn magic_is_crxg_little_endian() {
        assert_eq!(u32::from_le_bytes(*b"CRXG"), crate::constants::CRX_MAGIC);
    }

    #[test]
    fn reads_fields_in_order() {
        let header = read(&raw_header(3, 0x11, 1)).unwrap();

        assert_eq!(header.inner_x, -2);
        assert_eq!(header.inner_y, 7);
        assert_eq!(header.width, 64);
        assert_eq!(header.height, 32);
        assert_eq!(header.version, 3);
        assert_eq!(header.format, PixelFormat::Bgra32);
        assert_eq!(header.unknown, 0xBEEF);
        assert!(header.has_explicit_length());
        assert_eq!(header.compression_mode(), 1);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = raw_header(3, 0, 0);
        bytes[0] = b'X';

        assert!(matches!(
            read(&bytes),
            Err(CrxDecodeErrors::WrongMagicBytes(_))
        ));
    }

    #[test]
    fn rejects_versions_other_than_2_and_3() {
        for version in [0, 1, 4, 0xFFFF] {
            assert!(matches!(
                read(&raw_header(version, 0, 0)),
                Err(CrxDecodeErrors::UnsupportedVersion(v)) if v == version
            ));
        }
        assert!(read(&raw_header(2, 0, 0)).is_ok());
        assert!(read(&raw_header(3, 0, 0)).is_ok());
    }

    #[test]
    fn compression_mode_above_one_is_rejected() {
        for mode in 0..16_u16 {
            let result = read(&raw_header(3, 0x10 | mode, 0));

            if mode <= 1 {
                assert!(result.is_ok(), "mode {mode} should be accepted");
            } else {
                assert!(matches!(result, Err(CrxDecodeErrors::UnsupportedFlags(_))));
            }
        }
    }

    #[test]
    fn rejects_unknown_bpp() {
        assert!(matches!(
            read(&raw_header(3, 0, 2)),
            Err(CrxDecodeErrors::UnsupportedBpp(2))
        ));
    }

    #[test]
    fn truncated_header_is_an_io_error() {
        let bytes = raw_header(3, 0, 0);

        assert!(matches!(
            read(&bytes[..CRX_HEADER_SIZE - 1]),
            Err(CrxDecodeErrors::IoErrors(_))
        ));
    }

    #[test]
    fn write_mirrors_read() {
        let bytes = raw_header(2, 0x01, 0);
        let header = read(&bytes).unwrap();

        let mut out: Vec<u8> = vec![];
        header.write(&mut ZWriter::new(&mut out)).unwrap();

        assert_eq!(out, bytes);
    }

    #[test]
    fn normalizing_forces_explicit_length_only_with_clip_table() {
        let mut header = CrxHeader::new(1, 1, PixelFormat::Bgr24);
        assert!(header.normalized().has_explicit_length());

        header.version = 2;
        assert!(!header.normalized().has_explicit_length());
    }

    #[test]
    fn colorspaces_map_to_formats() {
        assert_eq!(
            PixelFormat::from_colorspace(ColorSpace::BGRA).unwrap(),
            PixelFormat::Bgra32
        );
        assert_eq!(PixelFormat::Bgr24.colorspace(), ColorSpace::BGR);
        assert!(PixelFormat::from_colorspace(ColorSpace::RGB).is_err());
    }
}
