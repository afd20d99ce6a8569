/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::CrxToolErrors;

pub fn read_file(path: &Path) -> Result<Vec<u8>, CrxToolErrors> {
    fs::read(path).map_err(|e| CrxToolErrors::Io(path.to_path_buf(), e))
}

pub fn write_file(path: &Path, contents: &[u8]) -> Result<(), CrxToolErrors> {
    debug!("Writing {} bytes to {:?}", contents.len(), path);
    fs::write(path, contents).map_err(|e| CrxToolErrors::Io(path.to_path_buf(), e))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Files to work on for `path`
///
/// A file is returned as is, a directory yields its files with the given
/// extension, sorted, without descending into subdirectories.
pub fn collect_inputs(path: &Path, extension: &str) -> Result<Vec<PathBuf>, CrxToolErrors> {
    if !path.is_dir() {
        if !path.exists() {
            return Err(CrxToolErrors::GenericString(format!(
                "Path {:?}, does not exist",
                path
            )));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|e| CrxToolErrors::Io(path.to_path_buf(), e))?;
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| CrxToolErrors::Io(path.to_path_buf(), e))?;
        let file = entry.path();

        if file.is_file() && has_extension(&file, extension) {
            files.push(file);
        }
    }
    files.sort();

    debug!("Found {} .{} files in {:?}", files.len(), extension, path);

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use crate::file_io::collect_inputs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("crx-bin-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    #[test]
    fn directories_are_filtered_and_sorted() {
        let dir = scratch_dir("collect");

        for file in ["b.crx", "a.CRX", "c.png", "nested/d.crx"] {
            fs::write(dir.join(file), b"").unwrap();
        }
        let found = collect_inputs(&dir, "crx").unwrap();

        assert_eq!(found, [dir.join("a.CRX"), dir.join("b.crx")]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn single_files_pass_through() {
        let dir = scratch_dir("single");
        let file = dir.join("image.json");
        fs::write(&file, "{}").unwrap();

        assert_eq!(collect_inputs(&file, "json").unwrap(), [file.clone()]);
        assert!(collect_inputs(&dir.join("missing.json"), "json").is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
