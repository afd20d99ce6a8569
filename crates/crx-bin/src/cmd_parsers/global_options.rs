/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use log::{info, warn, Level};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CmdOptions {
    pub max_width:   usize,
    pub max_height:  usize,
    pub strict_mode: bool
}

impl CmdOptions {
    pub fn new() -> CmdOptions {
        CmdOptions {
            max_width:   usize::from(u16::MAX),
            max_height:  usize::from(u16::MAX),
            strict_mode: false
        }
    }
}

pub fn parse_options(options: &ArgMatches) -> CmdOptions {
    let mut cmd_options = CmdOptions::new();

    if let Some(width) = options.get_one::<usize>("max-width") {
        cmd_options.max_width = *width;
    }
    if let Some(height) = options.get_one::<usize>("max-height") {
        cmd_options.max_height = *height;
    }
    if options.get_flag("strict") {
        info!("Strict mode enabled");
        cmd_options.strict_mode = true;
    }
    cmd_options
}

fn log_level(options: &ArgMatches) -> Level {
    if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    }
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = log_level(options);

    if let Err(e) = simple_logger::init_with_level(log_level) {
        // a logger was already installed, keep using it
        warn!("Could not initialize logger: {e}");
    }

    info!("Initialized logger");
    info!("Log level :{}", log_level);
}

#[cfg(test)]
mod tests {
    use log::Level;

    use crate::cmd_args::create_cmd_args;
    use crate::cmd_parsers::global_options::{log_level, parse_options, CmdOptions};

    #[test]
    fn defaults_allow_any_crx_size() {
        let matches = create_cmd_args()
            .try_get_matches_from(["crx", "probe", "x.crx"])
            .unwrap();

        assert_eq!(parse_options(&matches), CmdOptions::new());
        assert_eq!(log_level(&matches), Level::Warn);
    }

    #[test]
    fn limits_and_strictness_are_read() {
        let matches = create_cmd_args()
            .try_get_matches_from([
                "crx",
                "--max-width",
                "128",
                "--strict",
                "--trace",
                "export",
                "dir"
            ])
            .unwrap();
        let options = parse_options(&matches);

        assert_eq!(options.max_width, 128);
        assert_eq!(options.max_height, usize::from(u16::MAX));
        assert!(options.strict_mode);
        assert_eq!(log_level(&matches), Level::Trace);
    }
}
