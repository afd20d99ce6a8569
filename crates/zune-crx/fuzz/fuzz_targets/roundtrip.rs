#![no_main]

use libfuzzer_sys::fuzz_target;
use zune_crx::{CrxHeader, CrxImage, PixelFormat, RowOrder};

fuzz_target!(|data: &[u8]| {
    if data.len() > 2 {
        let format = if data[0] & 1 == 0 {
            PixelFormat::Bgr24
        } else {
            PixelFormat::Bgra32
        };
        let width = usize::from(data[1] % 64) + 1;
        let pixels = &data[2..];
        let height = pixels.len() / (width * format.pixel_size());

        if height == 0 {
            return;
        }
        let pixels = &pixels[..width * height * format.pixel_size()];
        let header = CrxHeader::new(width as u16, height as u16, format);

        let mut encoder = zune_crx::CrxEncoder::new(pixels, header, &[]);
        encoder.set_row_order(RowOrder::TopDown);

        let mut encoded = Vec::<u8>::new();
        encoder
            .encode(&mut encoded)
            .expect("Failed to encode valid pixels");

        let CrxImage { pixels: decoded, .. } =
            zune_crx::decode(&encoded).expect("Failed to decode what we encoded");

        assert!(decoded == pixels, "Round trip changed the pixels");
    }
});
