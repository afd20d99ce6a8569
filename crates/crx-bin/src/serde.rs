/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The JSON sidecar written next to exported images
//!
//! Key names match the sidecars produced by the original CRX tools so
//! existing metadata files can be rebuilt. 16 bit fields are written sign
//! extended and accepted back as either signed or unsigned values.

use serde::{Deserialize, Serialize};
use zune_crx::{ClipRecord, CrxEncodeErrors, CrxHeader, PixelFormat};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClipMetadata {
    pub field_0: i32,
    pub field_4: i32,
    pub field_6: i32,
    pub field_8: i32,
    #[serde(rename = "field_A")]
    pub field_a: i32,
    #[serde(rename = "field_C")]
    pub field_c: i32,
    #[serde(rename = "field_E")]
    pub field_e: i32
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    pub inner_x: i32,
    pub inner_y: i32,
    pub width:   i32,
    pub height:  i32,
    pub version: i32,
    pub flags:   i32,
    pub bpp:     i32,
    #[serde(rename = "Unknow")]
    pub unknown: i32,
    #[serde(default)]
    pub clips:   Vec<ClipMetadata>
}

/// Sign extend a 16 bit field the way it is exported
fn widen(value: u16) -> i32 {
    i32::from(value as i16)
}

/// Accept a signed or unsigned 16 bit value and keep its low 16 bits
fn narrow(field: &'static str, value: i32) -> Result<u16, CrxEncodeErrors> {
    if (i32::from(i16::MIN)..=i32::from(u16::MAX)).contains(&value) {
        Ok(value as u16)
    } else {
        Err(CrxEncodeErrors::ValueOutOfRange(field, i64::from(value)))
    }
}

fn narrow_signed(field: &'static str, value: i32) -> Result<i16, CrxEncodeErrors> {
    narrow(field, value).map(|v| v as i16)
}

impl Metadata {
    pub fn new(header: &CrxHeader, clips: &[ClipRecord]) -> Metadata {
        Metadata {
            inner_x: i32::from(header.inner_x),
            inner_y: i32::from(header.inner_y),
            width:   widen(header.width),
            height:  widen(header.height),
            version: widen(header.version),
            flags:   widen(header.flags),
            bpp:     widen(header.format.to_bpp()),
            unknown: widen(header.unknown),
            clips:   clips.iter().map(ClipMetadata::from).collect()
        }
    }

    /// The header described by this sidecar
    ///
    /// An unknown bpp falls back to 24 bit, the pixel format is taken from
    /// the image being imported anyway.
    pub fn header(&self) -> Result<CrxHeader, CrxEncodeErrors> {
        let bpp = narrow("Bpp", self.bpp)?;

        Ok(CrxHeader {
            inner_x: narrow_signed("InnerX", self.inner_x)?,
            inner_y: narrow_signed("InnerY", self.inner_y)?,
            width:   narrow("Width", self.width)?,
            height:  narrow("Height", self.height)?,
            version: narrow("Version", self.version)?,
            flags:   narrow("Flags", self.flags)?,
            format:  PixelFormat::from_bpp(bpp).unwrap_or_default(),
            unknown: narrow("Unknow", self.unknown)?
        })
    }

    pub fn clip_records(&self) -> Result<Vec<ClipRecord>, CrxEncodeErrors> {
        self.clips.iter().map(ClipMetadata::to_record).collect()
    }
}

impl From<&ClipRecord> for ClipMetadata {
    fn from(clip: &ClipRecord) -> Self {
        ClipMetadata {
            field_0: clip.field_0,
            field_4: i32::from(clip.field_4),
            field_6: i32::from(clip.field_6),
            field_8: i32::from(clip.field_8),
            field_a: i32::from(clip.field_a),
            field_c: i32::from(clip.field_c),
            field_e: i32::from(clip.field_e)
        }
    }
}

impl ClipMetadata {
    pub fn to_record(&self) -> Result<ClipRecord, CrxEncodeErrors> {
        Ok(ClipRecord {
            field_0: self.field_0,
            field_4: narrow_signed("field_4", self.field_4)?,
            field_6: narrow_signed("field_6", self.field_6)?,
            field_8: narrow_signed("field_8", self.field_8)?,
            field_a: narrow_signed("field_A", self.field_a)?,
            field_c: narrow_signed("field_C", self.field_c)?,
            field_e: narrow_signed("field_E", self.field_e)?
        })
    }
}
