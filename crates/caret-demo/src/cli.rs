#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo editor.
//!
//! Parses args manually to keep the binary lean. Every option can also be
//! set through a `CARET_DEMO_*` environment variable; explicit flags win.

use std::env;
use std::path::PathBuf;
use std::process;

use caret_widgets::CaretStrategy;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
caret-demo: a bordered multi-line editor in your terminal

USAGE:
    caret-demo [OPTIONS]

OPTIONS:
    --text TEXT          Initial buffer contents (default: \"ab\")
    --title TITLE        Border title (default: \"Test editor\")
    --caret MODE         Caret lookup: 'region' (default) or 'scan'
    --no-border          Draw the editor without a border
    --log-file PATH      Write logs to PATH (default: caret-demo.log)
    --help, -h           Show this help message
    --version, -V        Show version

Values may also be given as --flag=VALUE.

KEYBINDINGS:
    Arrows               Move (Shift extends the selection)
    Home / End           Line start / end (Ctrl: document start / end)
    PgUp / PgDn          Move one page
    Backspace / Delete   Delete backward / forward
    Esc / Ctrl+C         Quit

ENVIRONMENT VARIABLES:
    CARET_DEMO_TEXT      Override the default --text
    CARET_DEMO_TITLE     Override the default --title
    CARET_DEMO_CARET     Override the default --caret
    CARET_DEMO_LOG       Override the default --log-file
    RUST_LOG             Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Initial buffer contents.
    pub text: String,
    /// Title drawn in the top border.
    pub title: String,
    pub caret: CaretStrategy,
    /// Whether to draw a border around the editor.
    pub border: bool,
    pub log_file: PathBuf,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            text: "ab".into(),
            title: "Test editor".into(),
            caret: CaretStrategy::RegionLookup,
            border: true,
            log_file: PathBuf::from("caret-demo.log"),
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("caret-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with `var` as the environment.
    pub fn parse_from<F>(args: &[String], var: F) -> Result<Command, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; flags below override it.
        if let Some(val) = var("CARET_DEMO_TEXT") {
            opts.text = val;
        }
        if let Some(val) = var("CARET_DEMO_TITLE") {
            opts.title = val;
        }
        if let Some(val) = var("CARET_DEMO_CARET") {
            opts.caret = parse_caret(&val)?;
        }
        if let Some(val) = var("CARET_DEMO_LOG") {
            opts.log_file = PathBuf::from(val);
        }

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (arg.as_str(), None),
            };
            let mut value = |name: &str| -> Result<String, String> {
                inline
                    .clone()
                    .or_else(|| args.next().cloned())
                    .ok_or_else(|| format!("Missing value for {name}"))
            };

            match flag {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--no-border" => opts.border = false,
                "--text" => opts.text = value("--text")?,
                "--title" => opts.title = value("--title")?,
                "--caret" => opts.caret = parse_caret(&value("--caret")?)?,
                "--log-file" => opts.log_file = PathBuf::from(value("--log-file")?),
                other => return Err(format!("Unknown argument: {other}")),
            }
        }

        Ok(Command::Run(opts))
    }
}

fn parse_caret(value: &str) -> Result<CaretStrategy, String> {
    match value {
        "region" => Ok(CaretStrategy::RegionLookup),
        "scan" => Ok(CaretStrategy::AttributeScan),
        other => Err(format!("Invalid --caret value: {other} (expected region or scan)")),
    }
}
