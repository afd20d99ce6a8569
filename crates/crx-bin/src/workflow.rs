/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::{error, info, warn};
use zune_core::bytestream::ZCursor;
use zune_crx::{CrxDecoder, CrxEncodeErrors, CrxEncoder};

use crate::cmd_args::RowOrderOption;
use crate::cmd_parsers::get_decoder_options;
use crate::cmd_parsers::global_options::CmdOptions;
use crate::errors::CrxToolErrors;
use crate::file_io::{collect_inputs, read_file, write_file};
use crate::png_bridge::{decode_png, encode_png};
use crate::probe_files::probe_file;
use crate::serde::Metadata;

/// Decode `<name>.crx` into `<name>.json` and `<name>.png`
pub fn export_file(path: &Path, options: &CmdOptions) -> Result<(), CrxToolErrors> {
    info!("Exporting data from {:?}", path);

    let data = read_file(path)?;
    let image = CrxDecoder::new_with_options(ZCursor::new(&data), get_decoder_options(options))
        .decode_image()?;

    let header = &image.header;
    let metadata = Metadata::new(header, &image.clips);

    write_file(
        &path.with_extension("json"),
        serde_json::to_string_pretty(&metadata)?.as_bytes()
    )?;

    let png = encode_png(
        &image.pixels,
        usize::from(header.width),
        usize::from(header.height),
        header.format
    )?;
    write_file(&path.with_extension("png"), &png)
}

/// Encode `<name>.json` and `<name>.png` into `<name>.crx`
pub fn build_file(path: &Path, row_order: RowOrderOption) -> Result<(), CrxToolErrors> {
    let crx_path = path.with_extension("crx");

    info!("Building {:?}", crx_path);

    let metadata: Metadata = serde_json::from_slice(&read_file(path)?)?;
    let mut header = metadata.header()?;
    let clips = metadata.clip_records()?;

    let image = decode_png(&read_file(&path.with_extension("png"))?)?;

    let width = u16::try_from(image.width)
        .map_err(|_| CrxEncodeErrors::ValueOutOfRange("width", image.width as i64))?;
    let height = u16::try_from(image.height)
        .map_err(|_| CrxEncodeErrors::ValueOutOfRange("height", image.height as i64))?;

    if (width, height) != (header.width, header.height) {
        warn!(
            "{:?}: image is {}x{} but metadata says {}x{}, using the image size",
            path, width, height, header.width, header.height
        );
        header.width = width;
        header.height = height;
    }
    if i32::from(image.format.to_bpp()) != metadata.bpp {
        warn!(
            "{:?}: image is {:?} but metadata says bpp {}, using the image format",
            path, image.format, metadata.bpp
        );
    }
    header.format = image.format;

    let mut encoder = CrxEncoder::new(&image.pixels, header, &clips);
    encoder.set_row_order(row_order.to_row_order(image.format));

    let mut out = Vec::with_capacity(encoder.max_size());
    encoder.encode(&mut out)?;

    write_file(&crx_path, &out)
}

/// Run `operation` on every input, logging failures instead of stopping
///
/// Returns the number of inputs that failed.
pub fn run_batch<F>(inputs: &[PathBuf], mut operation: F) -> usize
where
    F: FnMut(&Path) -> Result<(), CrxToolErrors>
{
    let mut failures = 0;

    for input in inputs {
        if let Err(reason) = operation(input) {
            error!("{:?}: {:?}", input, reason);
            failures += 1;
        }
    }
    failures
}

pub fn run_subcommand(args: &ArgMatches, cmd_opts: &CmdOptions) -> Result<(), CrxToolErrors> {
    let (name, sub_args) = args
        .subcommand()
        .ok_or_else(|| CrxToolErrors::GenericString("No subcommand given".into()))?;

    let path = sub_args
        .get_one::<PathBuf>("path")
        .ok_or_else(|| CrxToolErrors::GenericString("No path given".into()))?;

    let extension = if name == "build" { "json" } else { "crx" };
    let inputs = collect_inputs(path, extension)?;

    let failures = match name {
        "export" => run_batch(&inputs, |file| export_file(file, cmd_opts)),
        "build" => {
            let row_order = sub_args
                .get_one::<RowOrderOption>("row-order")
                .copied()
                .unwrap_or(RowOrderOption::Legacy);

            run_batch(&inputs, |file| build_file(file, row_order))
        }
        "probe" => run_batch(&inputs, |file| {
            println!("{}", probe_file(file, cmd_opts)?);
            Ok(())
        }),
        other => {
            return Err(CrxToolErrors::GenericString(format!(
                "Unknown subcommand {other}"
            )))
        }
    };

    if failures > 0 {
        return Err(CrxToolErrors::GenericString(format!(
            "{failures} of {} files failed",
            inputs.len()
        )));
    }
    info!("Processed {} files", inputs.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use zune_crx::{CrxHeader, CrxImage, PixelFormat};

    use crate::cmd_args::RowOrderOption;
    use crate::cmd_parsers::global_options::CmdOptions;
    use crate::errors::CrxToolErrors;
    use crate::probe_files::probe_file;
    use crate::workflow::{build_file, export_file, run_batch};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("crx-workflow-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_crx(path: &Path, format: PixelFormat) -> CrxImage {
        let mut header = CrxHeader::new(3, 2, format);
        header.inner_x = -4;
        header.unknown = 77;

        let image = CrxImage {
            header,
            clips: vec![Default::default()],
            pixels: (0..header.pixel_buffer_size() as u8).collect()
        };
        fs::write(path, zune_crx::encode(&image).unwrap()).unwrap();
        image
    }

    #[test]
    fn export_then_build_restores_the_file() {
        let dir = scratch_dir("roundtrip");
        let crx = dir.join("sprite.crx");
        let original = write_crx(&crx, PixelFormat::Bgra32);
        let original_bytes = fs::read(&crx).unwrap();

        export_file(&crx, &CmdOptions::new()).unwrap();
        assert!(dir.join("sprite.json").exists());
        assert!(dir.join("sprite.png").exists());

        fs::remove_file(&crx).unwrap();
        build_file(&dir.join("sprite.json"), RowOrderOption::Legacy).unwrap();

        let rebuilt = zune_crx::decode(&fs::read(&crx).unwrap()).unwrap();
        assert_eq!(rebuilt.pixels, original.pixels);
        assert_eq!(rebuilt.clips, original.clips);
        assert_eq!(rebuilt.header, original.header.normalized());
        assert_eq!(fs::read(&crx).unwrap(), original_bytes);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn probe_reports_header_without_pixels() {
        let dir = scratch_dir("probe");
        let crx = dir.join("bg.crx");
        write_crx(&crx, PixelFormat::Bgr24);

        let report: serde_json::Value =
            serde_json::from_str(&probe_file(&crx, &CmdOptions::new()).unwrap()).unwrap();

        assert_eq!(report["metadata"]["InnerX"], -4);
        assert_eq!(report["metadata"]["Unknow"], 77);
        assert_eq!(report["metadata"]["Clips"].as_array().unwrap().len(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn batch_continues_after_failures() {
        let inputs = [
            PathBuf::from("one"),
            PathBuf::from("two"),
            PathBuf::from("three")
        ];
        let mut seen = vec![];

        let failures = run_batch(&inputs, |path| {
            seen.push(path.to_path_buf());
            if path == Path::new("two") {
                Err(CrxToolErrors::GenericString("broken".into()))
            } else {
                Ok(())
            }
        });

        assert_eq!(failures, 1);
        assert_eq!(seen, inputs);
    }
}
