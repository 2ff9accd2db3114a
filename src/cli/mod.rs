//! CLI module
//!
//! Command-line interface for schema inference.
//!
//! # Commands
//!
//! - `infer` - Infer a schema from JSON records (files or stdin)
//! - `merge` - Merge previously inferred schema documents
//! - `classify` - Classify a single inline JSON value

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
