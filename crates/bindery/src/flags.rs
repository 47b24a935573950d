//! Standard output flags.
//!
//! Commands that print objects get `--output/-o`, `--no-pretty`,
//! `--query/-q`, `--header-fgcolor` and `--header-bgcolor`. Commands that
//! print informational text get `--silent`. `--machine-friendly` is always
//! present. [`OutputSettings::from_matches`] reads whichever of these the
//! command declared.

use clap::{Arg, ArgAction, ArgMatches};
use console::Style;

use crate::output::OutputMode;

pub const OUTPUT: &str = "output";
pub const NO_PRETTY: &str = "no-pretty";
pub const QUERY: &str = "query";
pub const SILENT: &str = "silent";
pub const MACHINE_FRIENDLY: &str = "machine-friendly";
pub const HEADER_FG: &str = "header-fgcolor";
pub const HEADER_BG: &str = "header-bgcolor";

/// Flags for commands that print structured results.
pub fn object_args() -> Vec<Arg> {
    vec![
        Arg::new(OUTPUT)
            .long(OUTPUT)
            .short('o')
            .value_name("FORMAT")
            .default_value("table")
            .help("Output format: table, json or yaml"),
        Arg::new(NO_PRETTY)
            .long(NO_PRETTY)
            .action(ArgAction::SetTrue)
            .help("Print JSON on a single line"),
        Arg::new(QUERY)
            .long(QUERY)
            .short('q')
            .value_name("EXPR")
            .help("Filter the result with a query expression"),
        Arg::new(HEADER_FG)
            .long(HEADER_FG)
            .value_name("COLOR")
            .help("Table header foreground color"),
        Arg::new(HEADER_BG)
            .long(HEADER_BG)
            .value_name("COLOR")
            .help("Table header background color"),
    ]
}

/// The `--silent` flag for commands that print informational text.
pub fn silent_arg() -> Arg {
    Arg::new(SILENT)
        .long(SILENT)
        .action(ArgAction::SetTrue)
        .help("Do not print informational messages")
}

pub fn machine_friendly_arg() -> Arg {
    Arg::new(MACHINE_FRIENDLY)
        .long(MACHINE_FRIENDLY)
        .action(ArgAction::SetTrue)
        .help("Only print machine-readable output")
}

/// Output settings of one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub mode: OutputMode,
    pub pretty: bool,
    /// Empty means no query.
    pub query: String,
    /// `Some` only when the command declared `--silent`.
    pub silent: Option<bool>,
    pub machine_friendly: bool,
    pub header_fg: Option<String>,
    pub header_bg: Option<String>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            mode: OutputMode::Table,
            pretty: true,
            query: String::new(),
            silent: None,
            machine_friendly: false,
            header_fg: None,
            header_bg: None,
        }
    }
}

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.try_get_one::<String>(id).ok().flatten().cloned()
}

fn flag(matches: &ArgMatches, id: &str) -> Option<bool> {
    matches.try_get_one::<bool>(id).ok().flatten().copied()
}

impl OutputSettings {
    /// Reads the standard flags. Flags the command did not declare keep
    /// their defaults.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Self::default();
        Self {
            mode: string(matches, OUTPUT)
                .map(|value| OutputMode::from_flag(&value))
                .unwrap_or(defaults.mode),
            pretty: !flag(matches, NO_PRETTY).unwrap_or(false),
            query: string(matches, QUERY).unwrap_or_default(),
            silent: flag(matches, SILENT),
            machine_friendly: flag(matches, MACHINE_FRIENDLY).unwrap_or(false),
            header_fg: string(matches, HEADER_FG),
            header_bg: string(matches, HEADER_BG),
        }
    }

    /// The table header style from the header color flags.
    ///
    /// Colors are names (`red`, `bright.blue`) or 256-color numbers.
    pub fn header_style(&self) -> Style {
        let mut spec = Vec::new();
        if let Some(fg) = self.header_fg.as_deref().filter(|c| !c.is_empty()) {
            spec.push(fg.to_string());
        }
        if let Some(bg) = self.header_bg.as_deref().filter(|c| !c.is_empty()) {
            spec.push(format!("on_{}", bg));
        }
        Style::from_dotted_str(&spec.join("."))
    }
}
