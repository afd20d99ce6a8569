/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use zune_core::bytestream::ZByteIoError;
use zune_core::colorspace::ColorSpace;
use zune_inflate::errors::InflateDecodeErrors;

/// Broad classes of failures
///
/// A `Format` error means the container itself cannot be trusted, a
/// `CorruptData` error means the container was understood but the pixel
/// stream it carries is damaged. Neither leaves state behind, a caller
/// processing many images can move on to the next one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CrxErrorKind {
    /// Bad magic, unsupported version/flags/bpp, truncated header or clip table
    Format,
    /// Unknown filter tag, inflate failure, payload shorter than declared
    CorruptData
}

/// Possible Errors that may occur during decoding
#[non_exhaustive]
pub enum CrxDecodeErrors {
    /// The image does not start with `CRXG`
    ///
    /// The argument is the value found instead
    WrongMagicBytes(u32),
    /// Version was not 2 or 3
    UnsupportedVersion(u16),
    /// The compression mode (low nibble of flags) is above 1
    ///
    /// The argument is the whole flags field
    UnsupportedFlags(u16),
    /// The bpp field was neither 0 (24 bit) nor 1 (32 bit)
    UnsupportedBpp(u16),
    /// Width or height exceed the configured limits
    ///
    /// # Arguments
    /// - dimension name
    /// - configured maximum
    /// - value found in the header
    TooLargeDimensions(&'static str, usize, usize),
    /// An explicit payload length points past the end of the stream
    ///
    /// # Arguments
    /// - declared length
    /// - bytes actually remaining
    TruncatedPayload(usize, usize),
    /// A row started with a filter tag outside `0..=4`
    ///
    /// # Arguments
    /// - the tag
    /// - the row it was found on
    UnknownFilter(u8, usize),
    /// The decompressed row stream ended before all rows were reconstructed
    ///
    /// # Arguments
    /// - bytes needed
    /// - bytes left
    InsufficientData(usize, usize),
    /// A run length in an RLE row ran past the end of its channel plane
    ///
    /// # Arguments
    /// - row
    /// - run length
    /// - positions left in the plane
    RunOverflow(usize, usize, usize),
    /// Bytes follow an explicitly sized payload, only raised in strict mode
    ///
    /// The argument is the number of extra bytes
    TrailingData(usize),
    /// The caller supplied buffer cannot hold the image
    TooSmallOutput(usize, usize),
    /// Inflating the payload failed
    InflateErrors(InflateDecodeErrors),
    /// Generic message does not need heap allocation
    GenericStatic(&'static str),
    /// Reading the header or clip table failed
    IoErrors(ZByteIoError)
}

impl CrxDecodeErrors {
    /// Return which class of failure this is
    pub const fn kind(&self) -> CrxErrorKind {
        match self {
            Self::WrongMagicBytes(_)
            | Self::UnsupportedVersion(_)
            | Self::UnsupportedFlags(_)
            | Self::UnsupportedBpp(_)
            | Self::TooLargeDimensions(..)
            | Self::TooSmallOutput(..)
            | Self::GenericStatic(_)
            | Self::IoErrors(_) => CrxErrorKind::Format,

            Self::TruncatedPayload(..)
            | Self::UnknownFilter(..)
            | Self::InsufficientData(..)
            | Self::RunOverflow(..)
            | Self::TrailingData(_)
            | Self::InflateErrors(_) => CrxErrorKind::CorruptData
        }
    }
}

impl Debug for CrxDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WrongMagicBytes(found) => {
                writeln!(
                    f,
                    "Wrong magic bytes, expected `CRXG` as image start but found {found:#010X}"
                )
            }
            Self::UnsupportedVersion(version) => {
                writeln!(f, "Unsupported version {version}, expected either 2 or 3")
            }
            Self::UnsupportedFlags(flags) => {
                writeln!(
                    f,
                    "Unsupported compression mode {} in flags {flags:#06X}, expected 0 or 1",
                    flags & 0x0F
                )
            }
            Self::UnsupportedBpp(bpp) => {
                writeln!(f, "Unsupported bpp {bpp}, expected either 0 or 1")
            }
            Self::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension}, {found} exceeds {expected}"
                )
            }
            Self::TruncatedPayload(declared, available) => {
                writeln!(
                    f,
                    "Payload declares {declared} bytes but the stream has {available} left"
                )
            }
            Self::UnknownFilter(tag, row) => {
                writeln!(f, "Unknown filter {tag} on row {row}")
            }
            Self::InsufficientData(expected, found) => {
                writeln!(
                    f,
                    "Insufficient data required {expected} but remaining stream has {found}"
                )
            }
            Self::RunOverflow(row, count, remaining) => {
                writeln!(
                    f,
                    "Run of {count} on row {row} overflows plane with {remaining} positions left"
                )
            }
            Self::TrailingData(extra) => {
                writeln!(f, "{extra} trailing bytes after the compressed payload")
            }
            Self::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            Self::InflateErrors(err) => {
                writeln!(f, "Inflate error {:?}", err)
            }
            Self::GenericStatic(val) => {
                writeln!(f, "{val}")
            }
            Self::IoErrors(value) => {
                writeln!(f, "I/O error {:?}", value)
            }
        }
    }
}

impl From<ZByteIoError> for CrxDecodeErrors {
    fn from(value: ZByteIoError) -> Self {
        Self::IoErrors(value)
    }
}

impl From<InflateDecodeErrors> for CrxDecodeErrors {
    fn from(value: InflateDecodeErrors) -> Self {
        Self::InflateErrors(value)
    }
}

/// Errors encountered during encoding
#[non_exhaustive]
pub enum CrxEncodeErrors {
    /// Version was not 2 or 3
    UnsupportedVersion(u16),
    /// The compression mode in flags is above 1
    UnsupportedFlags(u16),
    /// Unsupported colorspace
    ///
    /// The first argument is the colorspace encountered
    /// The second argument is list of supported colorspaces
    UnsupportedColorspace(ColorSpace, &'static [ColorSpace]),
    /// Pixel buffer length doesn't match `width*height*pixel_size`
    ///
    /// # Arguments
    /// - expected length
    /// - actual length
    WrongInputSize(usize, usize),
    /// More clip records than a u32 count can describe
    TooManyClips(usize),
    /// Compressed payload does not fit a u32 length field
    TooLargePayload(usize),
    /// A metadata value does not fit its 16 bit field
    ValueOutOfRange(&'static str, i64),

    IoErrors(ZByteIoError)
}

impl CrxEncodeErrors {
    /// Return which class of failure this is
    ///
    /// Encoding never sees corrupt data, everything is a format problem
    pub const fn kind(&self) -> CrxErrorKind {
        CrxErrorKind::Format
    }
}

impl Debug for CrxEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedVersion(version) => {
                writeln!(f, "Cannot encode version {version}, expected either 2 or 3")
            }
            Self::UnsupportedFlags(flags) => {
                writeln!(
                    f,
                    "Cannot encode compression mode {} from flags {flags:#06X}",
                    flags & 0x0F
                )
            }
            Self::UnsupportedColorspace(found, supported) => {
                writeln!(f, "Cannot encode image with colorspace {found:?} into CRX, supported ones are {supported:?}")
            }
            Self::WrongInputSize(expected, found) => {
                writeln!(
                    f,
                    "Expected pixel buffer of {expected} bytes but found {found}"
                )
            }
            Self::TooManyClips(found) => {
                writeln!(f, "Too many clip records {found}, at most {} fit", u32::MAX)
            }
            Self::TooLargePayload(found) => {
                writeln!(
                    f,
                    "Too large compressed payload {found}, at most {} fit",
                    u32::MAX
                )
            }
            Self::ValueOutOfRange(field, value) => {
                writeln!(f, "Value {value} for {field} does not fit in 16 bits")
            }
            Self::IoErrors(v) => {
                writeln!(f, "I/O error {:?}", v)
            }
        }
    }
}

impl Display for CrxEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}
impl Display for CrxDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CrxEncodeErrors {}

#[cfg(feature = "std")]
impl std::error::Error for CrxDecodeErrors {}

impl From<ZByteIoError> for CrxEncodeErrors {
    fn from(value: ZByteIoError) -> Self {
        Self::IoErrors(value)
    }
}

#[cfg(test)]
mod tests {
    use zune_core::bytestream::ZByteIoError;

    use crate::errors::{CrxDecodeErrors, CrxErrorKind};

    #[test]
    fn structural_errors_are_format_errors() {
        assert_eq!(
            CrxDecodeErrors::WrongMagicBytes(0).kind(),
            CrxErrorKind::Format
        );
        assert_eq!(
            CrxDecodeErrors::UnsupportedFlags(2).kind(),
            CrxErrorKind::Format
        );
        assert_eq!(
            CrxDecodeErrors::IoErrors(ZByteIoError::NotEnoughBytes(4, 0)).kind(),
            CrxErrorKind::Format
        );
    }

    #[test]
    fn stream_errors_are_corrupt_data() {
        assert_eq!(
            CrxDecodeErrors::UnknownFilter(9, 0).kind(),
            CrxErrorKind::CorruptData
        );
        assert_eq!(
            CrxDecodeErrors::TruncatedPayload(10, 2).kind(),
            CrxErrorKind::CorruptData
        );
        assert_eq!(
            CrxDecodeErrors::RunOverflow(0, 9, 2).kind(),
            CrxErrorKind::CorruptData
        );
    }
}
