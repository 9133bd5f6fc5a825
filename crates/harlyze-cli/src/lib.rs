//! Library side of the `harlyze` binary.
//!
//! Every subcommand lives in [`commands`] and splits into a function that
//! builds the report and an `execute` that renders it, so the reports can be
//! checked without going through stdout.

use clap::ValueEnum;

pub mod commands;

/// How a report is written to stdout
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Styled text for a terminal
    Pretty,
    /// The serialized report
    Json,
    /// Comma-separated rows under a header line
    Table,
}
