/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use zune_crx::{CrxDecodeErrors, CrxEncodeErrors};

/// Everything that can go wrong while processing one file
pub enum CrxToolErrors {
    Decode(CrxDecodeErrors),
    Encode(CrxEncodeErrors),
    Io(PathBuf, std::io::Error),
    Json(serde_json::Error),
    PngDecode(png::DecodingError),
    PngEncode(png::EncodingError),
    /// PNG color layout with no CRX counterpart
    UnsupportedPng(png::ColorType),
    GenericString(String)
}

impl Debug for CrxToolErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => writeln!(f, "{err:?}"),
            Self::Encode(err) => writeln!(f, "{err:?}"),
            Self::Io(path, err) => writeln!(f, "{path:?}: {err}"),
            Self::Json(err) => writeln!(f, "Invalid metadata: {err}"),
            Self::PngDecode(err) => writeln!(f, "Cannot read PNG: {err}"),
            Self::PngEncode(err) => writeln!(f, "Cannot write PNG: {err}"),
            Self::UnsupportedPng(color) => {
                writeln!(f, "The PNG color type {color:?} is not supported")
            }
            Self::GenericString(err) => writeln!(f, "{err}")
        }
    }
}

impl Display for CrxToolErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

impl std::error::Error for CrxToolErrors {}

impl From<CrxDecodeErrors> for CrxToolErrors {
    fn from(value: CrxDecodeErrors) -> Self {
        Self::Decode(value)
    }
}

impl From<CrxEncodeErrors> for CrxToolErrors {
    fn from(value: CrxEncodeErrors) -> Self {
        Self::Encode(value)
    }
}

impl From<serde_json::Error> for CrxToolErrors {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<png::DecodingError> for CrxToolErrors {
    fn from(value: png::DecodingError) -> Self {
        Self::PngDecode(value)
    }
}

impl From<png::EncodingError> for CrxToolErrors {
    fn from(value: png::EncodingError) -> Self {
        Self::PngEncode(value)
    }
}

impl From<String> for CrxToolErrors {
    fn from(value: String) -> Self {
        Self::GenericString(value)
    }
}
