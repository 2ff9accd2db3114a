//! Record decoding
//!
//! Turns a byte stream into records for inference.
//!
//! # Overview
//!
//! The input is any sequence of top-level JSON values. An array contributes
//! each of its elements as a record and a bare object contributes itself, so
//! a single document, a JSON array export and JSON Lines all read the same way.

mod reader;

pub use reader::{open_file, read_records, RecordReader};

#[cfg(test)]
mod tests;
