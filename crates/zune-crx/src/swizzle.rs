/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Channel order conversion for 32 bit images
//!
//! The row stream stores 32 bit pixels as alpha, blue, green, red with the
//! alpha inverted (`0` is opaque). Decoded pixels are blue, green, red, alpha.

/// Convert stored `A B G R` pixels to `B G R (255-A)` in place
pub fn abgr_to_bgra_invert_alpha(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.rotate_left(1);
        px[3] = 255 - px[3];
    }
}

/// Convert `B G R A` pixels to the stored `(255-A) B G R` layout in place
pub fn bgra_to_abgr_invert_alpha(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px[3] = 255 - px[3];
        px.rotate_right(1);
    }
}
