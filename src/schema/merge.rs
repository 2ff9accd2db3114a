//! Field merging
//!
//! Folds two observations of the same field position into one, generalizing
//! types along [`FieldType::generalize`]. Merging is total: conflicts go to
//! the diagnostics sink and the left-hand side wins.

use super::bitsize;
use super::diagnostics::{Diagnostic, DiagnosticSink};
use super::types::{Field, FieldType, Schema};

/// Merge two optional observations; an absent side yields the other
pub fn merge_fields(
    a: Option<Field>,
    b: Option<Field>,
    sink: &mut dyn DiagnosticSink,
) -> Option<Field> {
    match (a, b) {
        (Some(a), Some(b)) => Some(merge_field(a, b, sink)),
        (a, b) => a.or(b),
    }
}

/// Merge `b` into `a`
pub fn merge_field(a: Field, b: Field, sink: &mut dyn DiagnosticSink) -> Field {
    merge_at(None, a, b, sink)
}

/// Key-wise union of two schemas, merging fields present in both
pub fn merge_schemas(mut a: Schema, b: Schema, sink: &mut dyn DiagnosticSink) -> Schema {
    for (key, incoming) in b.fields {
        let merged = match a.fields.remove(&key) {
            Some(existing) => merge_at(None, existing, incoming, sink),
            None => incoming,
        };
        a.fields.insert(key, merged);
    }
    a
}

pub(crate) fn child_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{name}"),
        None => name.to_string(),
    }
}

pub(crate) fn merge_at(
    parent: Option<&str>,
    mut a: Field,
    b: Field,
    sink: &mut dyn DiagnosticSink,
) -> Field {
    let path = child_path(parent, &a.name);

    if a.multiple != b.multiple {
        if a.is_unobserved() {
            a.multiple = b.multiple;
        } else if !b.is_unobserved() {
            sink.report(Diagnostic::Cardinality {
                path: path.clone(),
                existing: a.multiple,
                incoming: b.multiple,
            });
        }
    }

    a.nullable |= b.nullable;
    a.length = a.length.max(b.length);

    let field_type = match (a.field_type, b.field_type) {
        (Some(existing), Some(incoming)) => {
            if let Some(general) = existing.generalize(incoming) {
                Some(general)
            } else {
                sink.report(Diagnostic::Type {
                    path: path.clone(),
                    existing,
                    incoming,
                });
                Some(existing)
            }
        }
        (existing, incoming) => existing.or(incoming),
    };

    let signed = a.signed || b.signed;
    a.bits = if field_type == Some(FieldType::Integer) {
        required_bits(&a, signed).max(required_bits(&b, signed))
    } else {
        0
    };
    a.signed = signed;

    let fields = match (a.fields.take(), b.fields) {
        (Some(mut existing), Some(incoming)) => {
            for (key, child) in incoming {
                let merged = match existing.remove(&key) {
                    Some(prior) => merge_at(Some(path.as_str()), prior, child, sink),
                    None => child,
                };
                existing.insert(key, merged);
            }
            Some(existing)
        }
        (existing, incoming) => existing.or(incoming),
    };

    // Sub-fields of a losing object side were reported with the type conflict
    a.fields = if field_type == Some(FieldType::Object) {
        fields
    } else {
        None
    };
    a.field_type = field_type;
    a
}

/// Width `field` needs once the merged field is known to be `signed`
fn required_bits(field: &Field, signed: bool) -> u8 {
    if signed && !field.signed && field.bits > 0 {
        bitsize::widen(field.bits)
    } else {
        field.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::diagnostics::Discard;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn integer(name: &str, bits: u8, signed: bool) -> Field {
        Field {
            bits,
            signed,
            ..Field::typed(name, FieldType::Integer)
        }
    }

    #[test]
    fn test_absent_side_yields_other() {
        let f = Field::typed("x", FieldType::Boolean);
        assert_eq!(
            merge_fields(None, Some(f.clone()), &mut Discard),
            Some(f.clone())
        );
        assert_eq!(
            merge_fields(Some(f.clone()), None, &mut Discard),
            Some(f)
        );
        assert_eq!(merge_fields(None, None, &mut Discard), None);
    }

    #[test]
    fn test_bits_never_narrow() {
        let merged = merge_field(integer("n", 16, false), integer("n", 4, false), &mut Discard);
        assert_eq!(merged.bits, 16);
        assert!(!merged.signed);
    }

    #[test]
    fn test_signed_widens_unsigned_side() {
        // 255 needs 16 bits once negatives share the column
        let merged = merge_field(integer("n", 8, false), integer("n", 2, true), &mut Discard);
        assert!(merged.signed);
        assert_eq!(merged.bits, 16);

        let merged = merge_field(integer("n", 2, true), integer("n", 64, false), &mut Discard);
        assert_eq!(merged.bits, 64);
    }

    #[test]
    fn test_integer_float_drops_bits() {
        let merged = merge_field(
            integer("n", 8, false),
            Field::typed("n", FieldType::Float),
            &mut Discard,
        );
        assert_eq!(merged.field_type, Some(FieldType::Float));
        assert_eq!(merged.bits, 0);
    }

    #[test]
    fn test_type_conflict_keeps_left_and_reports() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let merged = merge_field(
            Field::typed("flag", FieldType::Boolean),
            integer("flag", 2, false),
            &mut diagnostics,
        );

        assert_eq!(merged.field_type, Some(FieldType::Boolean));
        assert_eq!(merged.bits, 0);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::Type {
                path: "flag".to_string(),
                existing: FieldType::Boolean,
                incoming: FieldType::Integer,
            }]
        );
    }

    #[test]
    fn test_cardinality_conflict_keeps_left() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut array = Field::typed("tags", FieldType::String);
        array.multiple = true;

        let merged = merge_field(
            Field::typed("tags", FieldType::String),
            array.clone(),
            &mut diagnostics,
        );
        assert!(!merged.multiple);
        assert_eq!(diagnostics.len(), 1);

        let merged = merge_field(array, Field::typed("tags", FieldType::String), &mut diagnostics);
        assert!(merged.multiple);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_null_adopts_array_cardinality() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut null = Field::new("tags");
        null.nullable = true;
        let mut array = Field::typed("tags", FieldType::String);
        array.multiple = true;

        let merged = merge_field(null, array, &mut diagnostics);
        assert!(merged.multiple);
        assert!(merged.nullable);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_nested_union_and_paths() {
        let mut left = BTreeMap::new();
        left.insert("a".to_string(), Field::typed("a", FieldType::Boolean));
        left.insert("b".to_string(), Field::typed("b", FieldType::String));
        let mut right = BTreeMap::new();
        right.insert("a".to_string(), Field::typed("a", FieldType::Date));
        right.insert("c".to_string(), Field::typed("c", FieldType::Float));

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let merged = merge_field(
            Field::object("obj", left),
            Field::object("obj", right),
            &mut diagnostics,
        );

        let fields = merged.fields.unwrap();
        assert_eq!(
            fields.keys().cloned().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(fields["a"].field_type, Some(FieldType::Boolean));
        assert_eq!(diagnostics[0].path(), "obj.a");
    }

    #[test]
    fn test_object_losing_type_conflict_drops_fields() {
        let mut sub = BTreeMap::new();
        sub.insert("a".to_string(), Field::typed("a", FieldType::Boolean));

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let merged = merge_field(
            Field::typed("x", FieldType::String),
            Field::object("x", sub),
            &mut diagnostics,
        );
        assert_eq!(merged.field_type, Some(FieldType::String));
        assert!(merged.fields.is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_merge_schemas_union() {
        let mut a = Schema::new();
        a.fields.insert("x".to_string(), integer("x", 4, false));
        let mut b = Schema::new();
        b.fields.insert("x".to_string(), integer("x", 8, false));
        b.fields.insert("y".to_string(), Field::typed("y", FieldType::Text));

        let merged = merge_schemas(a, b, &mut Discard);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("x").unwrap().bits, 8);
        assert_eq!(merged.get("y").unwrap().field_type, Some(FieldType::Text));
    }
}
