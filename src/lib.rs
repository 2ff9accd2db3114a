// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # record-schema
//!
//! Infers a structural schema from semi-structured JSON records and
//! reconciles it across many records into one description of field names,
//! types, nullability, cardinality and integer widths.
//!
//! ## Features
//!
//! - **Value Classification**: string, text, integer, float, boolean, date
//!   and object fields, with minimal integer bit widths
//! - **Schema Merging**: conflicting observations generalize along a fixed
//!   type lattice; irreconcilable ones are reported, never fatal
//! - **Diagnostics**: conflicts go to a caller-supplied sink
//! - **Parallel Classification**: records classify concurrently and merge
//!   serially in input order
//!
//! ## Quick Start
//!
//! ```rust
//! use record_schema::schema::{Diagnostic, FieldType, SchemaInferrer};
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"age": 30, "visit_date": "2010-09-14"}),
//!     json!({"age": 3.5, "visit_date": "unknown"}),
//! ];
//! let records: Vec<_> = records
//!     .into_iter()
//!     .filter_map(|r| r.as_object().cloned())
//!     .collect();
//!
//! let mut conflicts: Vec<Diagnostic> = Vec::new();
//! let schema = SchemaInferrer::new().infer_records(&records, &mut conflicts);
//!
//! assert_eq!(schema.get("age").unwrap().field_type, Some(FieldType::Float));
//! assert_eq!(
//!     schema.get("visit_date").unwrap().field_type,
//!     Some(FieldType::String)
//! );
//! assert!(conflicts.is_empty());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! records ──► RecordReader ──► SchemaInferrer::classify ──► Field tree
//!                                        │
//!                       merge_schemas ◄──┘   (lattice, left wins on conflict)
//!                                        │
//!                                 DiagnosticSink
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document the remaining FieldType variants and Schema accessors

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Inference settings
pub mod config;

/// Schema inference from JSON data
pub mod schema;

/// Record decoding from JSON streams
pub mod decode;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::InferenceConfig;
pub use error::{Error, Result};
pub use schema::{Diagnostic, DiagnosticSink, Field, FieldType, Schema, SchemaInferrer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
