//! Schema inference module
//!
//! Infers a field schema from decoded JSON records and reconciles it across
//! many records.
//!
//! # Features
//!
//! - **Type Inference**: Classifies values as string, text, integer, float,
//!   boolean, date or object
//! - **Bit Widths**: Tracks the minimal integer width seen per field
//! - **Schema Merging**: Generalizes conflicting types along a fixed lattice
//! - **Nullable Detection**: Records fields that were ever null
//! - **Cardinality**: Records fields that were ever arrays
//! - **Diagnostics**: Reports conflicts to a caller-supplied sink

pub mod bitsize;
mod diagnostics;
mod inference;
mod merge;
mod types;

pub use diagnostics::{Diagnostic, DiagnosticSink, Discard, LogSink};
pub use inference::{classify, infer_schema, SchemaInferrer};
pub use merge::{merge_field, merge_fields, merge_schemas};
pub use types::{Field, FieldType, Schema};
