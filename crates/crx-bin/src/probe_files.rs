/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::Path;

use serde::Serialize;
use zune_core::bytestream::ZCursor;
use zune_crx::CrxDecoder;

use crate::cmd_parsers::get_decoder_options;
use crate::cmd_parsers::global_options::CmdOptions;
use crate::errors::CrxToolErrors;
use crate::file_io::read_file;
use crate::serde::Metadata;

#[derive(Serialize)]
struct ProbeReport {
    file:          String,
    file_size:     usize,
    payload_bytes: usize,
    metadata:      Metadata
}

/// Read headers of a CRX file and describe them as pretty printed JSON
///
/// Pixels are not decompressed.
pub fn probe_file(path: &Path, options: &CmdOptions) -> Result<String, CrxToolErrors> {
    let data = read_file(path)?;

    let mut decoder =
        CrxDecoder::new_with_options(ZCursor::new(&data), get_decoder_options(options));
    decoder.decode_headers()?;

    let (header, clips, payload) = match (decoder.header(), decoder.clips(), decoder.payload()) {
        (Some(header), Some(clips), Some(payload)) => (header, clips, payload),
        _ => return Err(CrxToolErrors::GenericString("Headers were not decoded".into()))
    };

    let report = ProbeReport {
        file:          path.to_string_lossy().into_owned(),
        file_size:     data.len(),
        payload_bytes: payload.len(),
        metadata:      Metadata::new(header, clips)
    };

    Ok(serde_json::to_string_pretty(&report)?)
}
