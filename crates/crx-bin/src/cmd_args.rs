/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::builder::PossibleValue;
use clap::{value_parser, Arg, ArgAction, Command, ValueEnum};
use zune_crx::{PixelFormat, RowOrder};

/// Row order used when building CRX files
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RowOrderOption {
    /// Bottom up for 24 bit, top down for 32 bit
    Legacy,
    TopDown,
    BottomUp
}

impl RowOrderOption {
    pub const fn to_row_order(self, format: PixelFormat) -> RowOrder {
        match self {
            Self::Legacy => RowOrder::legacy(format),
            Self::TopDown => RowOrder::TopDown,
            Self::BottomUp => RowOrder::BottomUp
        }
    }
}

impl ValueEnum for RowOrderOption {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Legacy, Self::TopDown, Self::BottomUp]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(match self {
            Self::Legacy => PossibleValue::new("legacy"),
            Self::TopDown => PossibleValue::new("top-down"),
            Self::BottomUp => PossibleValue::new("bottom-up")
        })
    }
}

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path")
        .help(help)
        .value_parser(value_parser!(std::path::PathBuf))
        .required(true)
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("crx")
        .about("Export CRX images to PNG + JSON and build them back")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("export")
            .about("Write <name>.json and <name>.png next to a .crx file, or every .crx in a folder")
            .arg(path_arg("A .crx file or a folder of them")))
        .subcommand(Command::new("build")
            .about("Build <name>.crx from <name>.json and <name>.png, for a file or every .json in a folder")
            .arg(path_arg("A .json metadata file or a folder of them"))
            .arg(Arg::new("row-order")
                .long("row-order")
                .help("Order rows are stored in")
                .long_help("Order rows are stored in.\nlegacy stores 24 bit images bottom row first and 32 bit images top row first, the layout existing readers expect.")
                .default_value("legacy")
                .value_parser(value_parser!(RowOrderOption))))
        .subcommand(Command::new("probe")
            .about("Print the header and clip table of CRX files as JSON")
            .arg(path_arg("A .crx file or a folder of them")))
        .arg(Arg::new("debug")
            .long("debug")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about each file processed"))
        .arg(Arg::new("max-width")
            .long("max-width")
            .global(true)
            .help_heading("ADVANCED")
            .help("Refuse to decode images wider than this")
            .default_value("65535")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("max-height")
            .long("max-height")
            .global(true)
            .help_heading("ADVANCED")
            .help("Refuse to decode images taller than this")
            .default_value("65535")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("strict")
            .long("strict")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("ADVANCED")
            .help("Treat bytes left after the image data as an error"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::cmd_args::{create_cmd_args, RowOrderOption};

    #[test]
    fn cli_definition_is_valid() {
        create_cmd_args().debug_assert();
    }

    #[test]
    fn build_defaults_to_legacy_order() {
        let matches = create_cmd_args()
            .try_get_matches_from(["crx", "build", "a.json", "--debug"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "build");
        assert_eq!(
            sub.get_one::<PathBuf>("path"),
            Some(&PathBuf::from("a.json"))
        );
        assert_eq!(
            sub.get_one::<RowOrderOption>("row-order"),
            Some(&RowOrderOption::Legacy)
        );
        assert!(sub.get_flag("debug"));
    }
}
