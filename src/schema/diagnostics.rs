//! Non-fatal diagnostics raised during classification and merging
//!
//! Inference never aborts. Anything that loses or approximates information is
//! handed to a caller-supplied [`DiagnosticSink`], which may collect, log or
//! drop it.

use super::types::FieldType;
use serde::{Deserialize, Serialize};

/// A conflict or refusal at a dotted field path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Seen both as an array and as a scalar; the existing cardinality was kept
    Cardinality {
        path: String,
        existing: bool,
        incoming: bool,
    },

    /// Irreconcilable types; the existing type was kept
    Type {
        path: String,
        existing: FieldType,
        incoming: FieldType,
    },

    /// An array directly containing an array; the field was dropped
    NestedArray { path: String },
}

impl Diagnostic {
    /// Dotted path of the affected field
    pub fn path(&self) -> &str {
        match self {
            Diagnostic::Cardinality { path, .. }
            | Diagnostic::Type { path, .. }
            | Diagnostic::NestedArray { path } => path,
        }
    }

    /// Whether this was a merge conflict rather than a structural refusal
    pub fn is_conflict(&self) -> bool {
        !matches!(self, Diagnostic::NestedArray { .. })
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::Cardinality {
                path,
                existing,
                incoming,
            } => write!(
                f,
                "cardinality conflict at '{path}': multiple={existing} vs multiple={incoming}"
            ),
            Diagnostic::Type {
                path,
                existing,
                incoming,
            } => write!(f, "type conflict at '{path}': {existing} vs {incoming}"),
            Diagnostic::NestedArray { path } => {
                write!(f, "array at '{path}' cannot contain sub-arrays")
            }
        }
    }
}

/// Receiver for diagnostics
pub trait DiagnosticSink {
    /// Accept one diagnostic
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Emits every diagnostic as a `tracing` warning
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(path = diagnostic.path(), "{}", diagnostic);
    }
}

/// Drops every diagnostic
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}
