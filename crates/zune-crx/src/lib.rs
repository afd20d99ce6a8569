/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding CRX (`CRXG`) images
//!
//! CRX is a small container used by visual novel engines for sprites and
//! backgrounds. A file is a fixed header, an optional clip table and a zlib
//! payload holding the pixels as a stream of filtered rows.
//!
//! # Features
//! - Decoding all five row filters
//! - Encoding, with the left filter
//! - Clip table and opaque header fields preserved
//! - `no_std`
//!
//! # Example
//! ```no_run
//! let bytes = std::fs::read("image.crx").unwrap();
//! let image = zune_crx::decode(&bytes).unwrap();
//! let encoded = zune_crx::encode(&image).unwrap();
//! ```
//!
//! ## `no_std`
//! You can use `no_std` with alloc feature to compile for `no_std` endpoints

#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;
extern crate core;

pub use container::*;
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use filters::{FilterMethod, RowOrder};
pub use header::*;
pub use image::*;
pub use zune_core;

pub mod compress;
pub mod constants;
mod container;
mod decoder;
mod encoder;
mod errors;
pub mod filters;
mod header;
mod image;
mod swizzle;
