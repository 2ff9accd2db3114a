//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Infer field schemas from semi-structured JSON records
#[derive(Parser, Debug)]
#[command(name = "record-schema")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Inference settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Infer the schema of all records in the given files (stdin if none)
    Infer {
        /// Record files: JSON arrays, objects or JSON Lines
        files: Vec<PathBuf>,

        /// Character count from which strings are classified as text
        #[arg(long)]
        text_threshold: Option<usize>,

        /// Classify date-like strings as plain strings
        #[arg(long)]
        no_dates: bool,

        /// Classify records on all cores before merging
        #[arg(long)]
        parallel: bool,

        /// Emit conflicts alongside the schema instead of logging them
        #[arg(long)]
        conflicts: bool,
    },

    /// Merge schema documents produced by `infer`, left to right
    Merge {
        /// Schema files (JSON)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit conflicts alongside the schema instead of logging them
        #[arg(long)]
        conflicts: bool,
    },

    /// Classify one inline JSON value
    Classify {
        /// JSON value, e.g. '[1, -2, 3]'
        value: String,

        /// Field name to report
        #[arg(short, long, default_value = "value")]
        name: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
