//! CLI argument definitions for the Heurist flattener.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "heurist-flatten",
    version,
    about = "Flatten Heurist record exports into validated tabular rows",
    long_about = "Derive one table schema per Heurist record type and flatten exported\n\
                  records into rows that conform to it.\n\n\
                  Rows are written as JSON lines, one object per record."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the table schema derived for each record type.
    Schema(SchemaArgs),

    /// Flatten and validate exported records.
    Flatten(FlattenArgs),
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Structural metadata export (record types and their fields).
    #[arg(long = "structure", value_name = "FILE")]
    pub structure: PathBuf,
}

#[derive(Parser)]
pub struct FlattenArgs {
    /// Structural metadata export (record types and their fields).
    #[arg(long = "structure", value_name = "FILE")]
    pub structure: PathBuf,

    /// Record export to flatten.
    #[arg(long = "records", value_name = "FILE")]
    pub records: PathBuf,

    /// Only process records of this record type.
    #[arg(long = "record-type", value_name = "ID")]
    pub record_type: Option<i64>,

    /// Flag date fields that carry no compound (fuzzy) date.
    ///
    /// Flagged rows are still written unless `--reject-flagged` is also set.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Exclude flagged rows from the output and count them as failures.
    #[arg(long = "reject-flagged")]
    pub reject_flagged: bool,

    /// Write JSON lines to this file instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the first N rows of each record type as a table on stderr.
    #[arg(long = "preview", value_name = "N")]
    pub preview: Option<usize>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
