/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use nanorand::{Rng, WyRand};
use zune_core::bytestream::ZCursor;
use zune_crx::{
    decode, encode, ClipRecord, CrxDecoder, CrxEncoder, CrxHeader, CrxImage, PixelFormat,
    RowOrder
};

fn random_pixels(header: &CrxHeader, seed: u64) -> Vec<u8> {
    let mut pixels = vec![0_u8; header.pixel_buffer_size()];
    WyRand::new_seed(seed).fill(&mut pixels);
    pixels
}

fn clips() -> Vec<ClipRecord> {
    vec![
        ClipRecord {
            field_0: 7,
            field_4: -1,
            field_6: 2,
            field_8: i16::MIN,
            field_a: i16::MAX,
            field_c: 0,
            field_e: 99
        },
        ClipRecord::default(),
    ]
}

fn encode_top_down(pixels: &[u8], header: CrxHeader, clips: &[ClipRecord]) -> Vec<u8> {
    let mut encoder = CrxEncoder::new(pixels, header, clips);
    encoder.set_row_order(RowOrder::TopDown);

    let mut out = vec![];
    encoder.encode(&mut out).unwrap();
    out
}

#[test]
fn bgra_round_trip_is_exact() {
    let mut header = CrxHeader::new(37, 19, PixelFormat::Bgra32);
    header.inner_x = -20;
    header.inner_y = 11;
    header.unknown = 0x1234;

    let image = CrxImage {
        header,
        clips: clips(),
        pixels: random_pixels(&header, 1)
    };
    let decoded = decode(&encode(&image).unwrap()).unwrap();

    assert_eq!(decoded.pixels, image.pixels);
    assert_eq!(decoded.clips, image.clips);
    // only the framing flag may change
    assert_eq!(decoded.header.flags & !0x10, header.flags);
    assert_eq!(decoded.header, header.normalized());
}

#[test]
fn bgr_top_down_round_trip_is_exact() {
    let header = CrxHeader::new(23, 17, PixelFormat::Bgr24);
    let pixels = random_pixels(&header, 2);

    let decoded = decode(&encode_top_down(&pixels, header, &clips())).unwrap();

    assert_eq!(decoded.pixels, pixels);
    assert_eq!(decoded.clips, clips());
}

#[test]
fn bgr_legacy_order_stores_rows_bottom_up() {
    let header = CrxHeader::new(5, 4, PixelFormat::Bgr24);
    let pixels = random_pixels(&header, 3);
    let stride = 5 * 3;

    let image = CrxImage {
        header,
        clips: vec![],
        pixels: pixels.clone()
    };
    let decoded = decode(&encode(&image).unwrap()).unwrap();

    let flipped: Vec<u8> = pixels.chunks_exact(stride).rev().flatten().copied().collect();
    assert_eq!(decoded.pixels, flipped);
}

#[test]
fn version_two_keeps_implicit_framing() {
    let mut header = CrxHeader::new(4, 4, PixelFormat::Bgra32);
    header.version = 2;
    let pixels = random_pixels(&header, 4);

    let bytes = encode_top_down(&pixels, header, &[]);
    let mut decoder = CrxDecoder::new(ZCursor::new(&bytes));

    assert_eq!(decoder.decode().unwrap(), pixels);

    let read = decoder.header().unwrap();
    assert!(!read.has_explicit_length());
    assert_eq!(*read, header);
}

#[test]
fn flat_image_compresses_well() {
    let header = CrxHeader::new(256, 256, PixelFormat::Bgr24);
    let pixels = vec![200_u8; header.pixel_buffer_size()];

    let bytes = encode_top_down(&pixels, header, &[]);

    assert!(bytes.len() < pixels.len() / 20);
    assert_eq!(decode(&bytes).unwrap().pixels, pixels);
}

#[test]
fn single_pixel_images() {
    for format in [PixelFormat::Bgr24, PixelFormat::Bgra32] {
        let header = CrxHeader::new(1, 1, format);
        let pixels = random_pixels(&header, 5);

        let bytes = encode_top_down(&pixels, header, &[]);
        assert_eq!(decode(&bytes).unwrap().pixels, pixels);
    }
}

#[test]
fn empty_images_round_trip() {
    for (w, h) in [(0, 0), (0, 3), (3, 0)] {
        let header = CrxHeader::new(w, h, PixelFormat::Bgra32);

        let bytes = encode_top_down(&[], header, &[]);
        let decoded = decode(&bytes).unwrap();

        assert!(decoded.pixels.is_empty());
        assert_eq!((decoded.header.width, decoded.header.height), (w, h));
    }
}
