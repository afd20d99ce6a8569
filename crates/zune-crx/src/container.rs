/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Splitting a CRX file into header, clip table and compressed payload
//! and joining them back together.
use alloc::vec::Vec;

use zune_core::bytestream::{ZByteReaderTrait, ZByteWriterTrait, ZCursor, ZReader, ZWriter};
use zune_core::log::{trace, warn};

use crate::errors::{CrxDecodeErrors, CrxEncodeErrors};
use crate::header::{ClipRecord, CrxHeader};

/// A parsed but not yet decompressed CRX file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CrxContainer {
    pub header:  CrxHeader,
    pub clips:   Vec<ClipRecord>,
    pub payload: Vec<u8>
}

impl CrxContainer {
    /// Parse a whole file held in memory, leniently
    pub fn parse(data: &[u8]) -> Result<CrxContainer, CrxDecodeErrors> {
        CrxContainer::read(&mut ZReader::new(ZCursor::new(data)), false)
    }

    /// Read header, clip table and payload from a stream
    ///
    /// With an explicit length, bytes after the payload are reported with a
    /// warning, or rejected with [`CrxDecodeErrors::TrailingData`] when
    /// `strict` is set.
    pub fn read<T: ZByteReaderTrait>(
        stream: &mut ZReader<T>, strict: bool
    ) -> Result<CrxContainer, CrxDecodeErrors> {
        let header = CrxHeader::read(stream)?;

        trace!("Width: {}", header.width);
        trace!("Height: {}", header.height);
        trace!("Version: {}", header.version);
        trace!("Flags: {:#06X}", header.flags);
        trace!("Format: {:?}", header.format);

        let mut clips = Vec::new();

        if header.has_clip_table() {
            let count = stream.get_u32_le_err()?;

            trace!("Clip records: {count}");

            // the count is untrusted, let the table grow as records are read
            for _ in 0..count {
                clips.push(ClipRecord::read(stream)?);
            }
        }

        let declared = if header.has_explicit_length() {
            Some(stream.get_u32_le_err()? as usize)
        } else {
            None
        };

        let mut payload = Vec::new();
        stream.read_all(&mut payload)?;

        if let Some(length) = declared {
            if length > payload.len() {
                return Err(CrxDecodeErrors::TruncatedPayload(length, payload.len()));
            }
            let extra = payload.len() - length;

            if extra > 0 {
                if strict {
                    return Err(CrxDecodeErrors::TrailingData(extra));
                }
                warn!("Ignoring {extra} bytes after the compressed payload");
                payload.truncate(length);
            }
        }

        trace!("Payload: {} bytes", payload.len());

        Ok(CrxContainer {
            header,
            clips,
            payload
        })
    }

    /// The header as [`write_container`] stores it
    pub const fn normalized_header(&self) -> CrxHeader {
        self.header.normalized()
    }

    /// Serialize to bytes, see [`write_container`]
    pub fn to_bytes(&self) -> Result<Vec<u8>, CrxEncodeErrors> {
        let mut out = Vec::new();
        write_container(&self.header, &self.clips, &self.payload, &mut out)?;
        Ok(out)
    }
}

/// Write a complete CRX file
///
/// The header is normalized first, version 3 files always get explicit
/// length framing. A clip table is only written for version 3 and up.
///
/// Returns the number of bytes written.
pub fn write_container<T: ZByteWriterTrait>(
    header: &CrxHeader, clips: &[ClipRecord], payload: &[u8], sink: T
) -> Result<usize, CrxEncodeErrors> {
    header.check_encodable()?;

    let header = header.normalized();
    let mut writer = ZWriter::new(sink);

    header.write(&mut writer)?;

    if header.has_clip_table() {
        let count =
            u32::try_from(clips.len()).map_err(|_| CrxEncodeErrors::TooManyClips(clips.len()))?;

        writer.write_u32_le_err(count)?;

        for clip in clips {
            clip.write(&mut writer)?;
        }
    } else if !clips.is_empty() {
        warn!(
            "Version {} has no clip table, dropping {} clip records",
            header.version,
            clips.len()
        );
    }

    if header.has_explicit_length() {
        let length = u32::try_from(payload.len())
            .map_err(|_| CrxEncodeErrors::TooLargePayload(payload.len()))?;

        writer.write_u32_le_err(length)?;
    }
    writer.write_all(payload)?;

    Ok(writer.bytes_written())
}
