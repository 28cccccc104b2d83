//! CLI argument parsing via `clap`.
//!
//! Parsing never exits the process: help, version and parse failures are
//! returned so the binary decides what to print and which code to use.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use thiserror::Error;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nibbler",
    about = "Run lint rules over files and explore the results rule by rule",
    long_about = "Nibbler lints the given files, prints statistics and a per-rule summary, then asks which rule to show in detail.\n\nConfiguration precedence: CLI > nibbler.toml > defaults.",
    after_help = "Examples:\n  nibbler src\n  nibbler --ext .js,.jsx src lib\n  nibbler --config conf/nibbler.toml 'src/**/*.js'\n  nibbler --format json src",
    disable_version_flag = true
)]
/// Top-level CLI options.
pub struct Cli {
    #[arg(value_name = "PATH", help = "Files, directories or glob patterns to lint")]
    pub files: Vec<String>,
    #[arg(
        long,
        value_name = "LIST",
        help = "File extensions to lint in directories, comma-separated (default: js)"
    )]
    pub ext: Vec<String>,
    #[arg(long, value_name = "PATH", help = "Path to a nibbler.toml|yaml config file")]
    pub config: Option<String>,
    #[arg(
        long,
        value_name = "NAME",
        help = "Print the whole report with one formatter (stylish, stats, summary, detailed, json) instead of the interactive flow"
    )]
    pub format: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable colored output")]
    pub no_color: bool,
    #[arg(short = 'v', long, action = clap::ArgAction::SetTrue, help = "Print version")]
    pub version: bool,
}

/// What the user asked for.
#[derive(Debug)]
pub enum Invocation {
    Help(String),
    Version(String),
    Lint(Cli),
}

#[derive(Debug, Error)]
#[error("{0}")]
/// Malformed command line; the message is ready to print.
pub struct OptionsError(String);

pub fn version_string() -> String {
    format!("v{}", crate::VERSION)
}

pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}

/// Parse `args` (program name first).
///
/// `--version` wins over everything else; no paths means help.
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation, OptionsError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) if cli.version => Ok(Invocation::Version(version_string())),
        Ok(cli) if cli.files.is_empty() => Ok(Invocation::Help(help_text())),
        Ok(cli) => Ok(Invocation::Lint(cli)),
        Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(Invocation::Help(help_text())),
        Err(e) => Err(OptionsError(e.render().to_string().trim_end().to_string())),
    }
}
