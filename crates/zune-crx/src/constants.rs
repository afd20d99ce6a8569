/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// `CRXG` read as a little endian u32
pub const CRX_MAGIC: u32 = 0x4758_5243;

/// magic + 8 u16 header fields
pub const CRX_HEADER_SIZE: usize = 4 + 8 * 2;

/// one i32 + six i16 fields
pub const CRX_CLIP_RECORD_SIZE: usize = 16;

/// First version which carries a clip table
pub const CRX_CLIP_TABLE_VERSION: u16 = 3;

/// Low nibble of the flags field, the compression mode
pub const CRX_COMPRESSION_MASK: u16 = 0x0F;

/// Set when a u32 payload length precedes the compressed data
pub const CRX_EXPLICIT_LENGTH_FLAG: u16 = 0x10;

/// Highest compression mode the decoder understands
pub const CRX_MAX_COMPRESSION_MODE: u16 = 1;
