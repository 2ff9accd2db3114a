//! Schema inference from JSON values

use super::bitsize;
use super::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use super::merge::{child_path, merge_at, merge_schemas};
use super::types::{Field, FieldType, Schema};
use crate::config::{InferenceConfig, FLOATING_POINT_ERROR};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use serde_json::{Map, Number, Value};
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Layouts a string may match to be classified as a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateLayout {
    /// `2006-01-02`
    Date,
    /// `2006-01-02T15:04:05`
    DateTime,
    /// `2006-01-02T15:04:05Z`
    DateTimeUtc,
    /// `2006-01-02T15:04:05+07:00`
    DateTimeOffset,
}

const DATE_LAYOUTS: [DateLayout; 4] = [
    DateLayout::Date,
    DateLayout::DateTime,
    DateLayout::DateTimeUtc,
    DateLayout::DateTimeOffset,
];

impl DateLayout {
    fn parses(self, s: &str) -> bool {
        // %.f also accepts a missing fraction
        match self {
            DateLayout::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
            DateLayout::DateTime => {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
            }
            DateLayout::DateTimeUtc => {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ").is_ok()
            }
            DateLayout::DateTimeOffset => {
                DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%:z").is_ok()
            }
        }
    }
}

/// Every layout starts with a zero-padded `YYYY-MM-DD`, followed by an
/// uppercase `T` when a time is present, and never contains whitespace
fn has_date_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 10
        && bytes[..10].iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
        && (bytes.len() == 10 || bytes[10] == b'T')
        && !bytes.iter().any(u8::is_ascii_whitespace)
}

fn is_date(s: &str) -> bool {
    has_date_prefix(s) && DATE_LAYOUTS.iter().any(|layout| layout.parses(s))
}

/// Schema inferrer with configuration options
///
/// Stateless apart from its settings: the running schema is owned by the
/// caller, so one inferrer can serve any number of independent
/// accumulations, including from several threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaInferrer {
    config: InferenceConfig,
}

impl SchemaInferrer {
    /// Create a new schema inferrer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inferrer from loaded settings
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Set the length from which strings are classified as text
    #[must_use]
    pub fn with_text_threshold(mut self, threshold: usize) -> Self {
        self.config.text_threshold = threshold;
        self
    }

    /// Enable/disable date detection
    #[must_use]
    pub fn with_date_detection(mut self, enabled: bool) -> Self {
        self.config.detect_dates = enabled;
        self
    }

    /// Current settings
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Classify one value observed under `name`
    ///
    /// Returns `None` when the value is an array holding arrays; that refusal
    /// is reported to `sink`.
    pub fn classify(
        &self,
        name: &str,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<Field> {
        self.classify_at(None, name, value, sink)
    }

    /// Infer the schema of a single record
    pub fn infer(&self, record: &Map<String, Value>, sink: &mut dyn DiagnosticSink) -> Schema {
        Schema::from(self.classify_object(None, record, sink))
    }

    /// Infer a record and fold it into `schema`
    pub fn accumulate(
        &self,
        schema: Schema,
        record: &Map<String, Value>,
        sink: &mut dyn DiagnosticSink,
    ) -> Schema {
        let incoming = self.infer(record, sink);
        merge_schemas(schema, incoming, sink)
    }

    /// Infer the schema of a sequence of records, in order
    pub fn infer_records<I, R>(&self, records: I, sink: &mut dyn DiagnosticSink) -> Schema
    where
        I: IntoIterator<Item = R>,
        R: Borrow<Map<String, Value>>,
    {
        let mut count = 0usize;
        let schema = records.into_iter().fold(Schema::new(), |schema, record| {
            count += 1;
            self.accumulate(schema, record.borrow(), sink)
        });
        tracing::debug!(records = count, fields = schema.len(), "Inferred schema");
        schema
    }

    /// Classify records concurrently, then merge serially in input order
    ///
    /// Produces the same schema and the same diagnostics, in the same order,
    /// as [`SchemaInferrer::infer_records`].
    pub fn infer_parallel(
        &self,
        records: &[Map<String, Value>],
        sink: &mut dyn DiagnosticSink,
    ) -> Schema {
        let classified: Vec<(Schema, Vec<Diagnostic>)> = records
            .par_iter()
            .map(|record| {
                let mut local: Vec<Diagnostic> = Vec::new();
                let schema = self.infer(record, &mut local);
                (schema, local)
            })
            .collect();

        let schema = classified
            .into_iter()
            .fold(Schema::new(), |schema, (incoming, local)| {
                for diagnostic in local {
                    sink.report(diagnostic);
                }
                merge_schemas(schema, incoming, sink)
            });
        tracing::debug!(
            records = records.len(),
            fields = schema.len(),
            "Inferred schema in parallel"
        );
        schema
    }

    fn classify_at(
        &self,
        parent: Option<&str>,
        name: &str,
        value: &Value,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<Field> {
        let mut field = Field::new(name);

        match value {
            Value::Null => field.nullable = true,
            Value::Bool(_) => field.field_type = Some(FieldType::Boolean),
            Value::Number(n) => classify_number(&mut field, n),
            Value::String(s) => self.classify_string(&mut field, s),
            Value::Object(map) => {
                let path = child_path(parent, name);
                field.field_type = Some(FieldType::Object);
                field.fields = Some(self.classify_object(Some(path.as_str()), map, sink));
            }
            Value::Array(items) => return self.classify_array(parent, name, items, sink),
        }

        Some(field)
    }

    fn classify_object(
        &self,
        path: Option<&str>,
        map: &Map<String, Value>,
        sink: &mut dyn DiagnosticSink,
    ) -> BTreeMap<String, Field> {
        let mut fields = BTreeMap::new();
        for (key, value) in map {
            if let Some(field) = self.classify_at(path, key, value, sink) {
                fields.insert(key.clone(), field);
            }
        }
        fields
    }

    /// Elements share the array's name and merge into one field
    fn classify_array(
        &self,
        parent: Option<&str>,
        name: &str,
        items: &[Value],
        sink: &mut dyn DiagnosticSink,
    ) -> Option<Field> {
        if items.iter().any(Value::is_array) {
            sink.report(Diagnostic::NestedArray {
                path: child_path(parent, name),
            });
            return None;
        }

        let mut merged: Option<Field> = None;
        for item in items {
            let Some(element) = self.classify_at(parent, name, item, sink) else {
                continue;
            };
            merged = Some(match merged {
                Some(prior) => merge_at(parent, prior, element, sink),
                None => element,
            });
        }

        let mut field = merged.unwrap_or_else(|| Field::new(name));
        field.multiple = true;
        Some(field)
    }

    fn classify_string(&self, field: &mut Field, s: &str) {
        field.length = s.chars().count();
        field.field_type = Some(if self.config.detect_dates && is_date(s) {
            FieldType::Date
        } else if field.length >= self.config.text_threshold {
            FieldType::Text
        } else {
            FieldType::String
        });
    }
}

fn classify_number(field: &mut Field, n: &Number) {
    if let Some(x) = n.as_u64() {
        set_unsigned(field, x);
    } else if let Some(x) = n.as_i64() {
        set_signed(field, x);
    } else if let Some(x) = n.as_f64() {
        classify_float(field, x);
    }
}

/// Floats within [`FLOATING_POINT_ERROR`] of a 64-bit integer count as integers
fn classify_float(field: &mut Field, x: f64) {
    let frac = x.abs().fract();
    let integral = frac < FLOATING_POINT_ERROR || frac > 1.0 - FLOATING_POINT_ERROR;
    let rounded = x.round();

    if integral && rounded >= 0.0 && rounded < u64::MAX as f64 {
        set_unsigned(field, rounded as u64);
    } else if integral && rounded < 0.0 && rounded >= i64::MIN as f64 {
        set_signed(field, rounded as i64);
    } else {
        field.field_type = Some(FieldType::Float);
    }
}

fn set_unsigned(field: &mut Field, x: u64) {
    field.field_type = Some(FieldType::Integer);
    field.bits = bitsize::unsigned(x);
}

fn set_signed(field: &mut Field, x: i64) {
    field.field_type = Some(FieldType::Integer);
    field.signed = x < 0;
    field.bits = if x < 0 {
        bitsize::signed(x)
    } else {
        bitsize::unsigned(x as u64)
    };
}

/// Classify a single value with default settings, logging diagnostics
pub fn classify(name: &str, value: &Value) -> Option<Field> {
    SchemaInferrer::new().classify(name, value, &mut LogSink)
}

/// Infer schema from a single JSON record (convenience function)
pub fn infer_schema(record: &Value) -> Result<Schema> {
    match record {
        Value::Object(map) => Ok(SchemaInferrer::new().infer(map, &mut LogSink)),
        other => Err(Error::not_an_object(0, other)),
    }
}
