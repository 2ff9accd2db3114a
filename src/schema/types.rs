//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of value observed at a field position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Short exact-match string (keyword)
    String,
    /// Long free text, intended for full-text search
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Object,
}

impl FieldType {
    /// Most specific type covering both `self` and `other`
    ///
    /// Returns `None` when the pair is irreconcilable.
    pub fn generalize(self, other: FieldType) -> Option<FieldType> {
        use FieldType::{Date, Float, Integer, String, Text};

        match (self, other) {
            (a, b) if a == b => Some(a),
            (Integer, Float) | (Float, Integer) => Some(Float),
            (Text, String | Date) | (String | Date, Text) => Some(Text),
            // A date mixed with short strings stays an exact-match string
            (Date, String) | (String, Date) => Some(String),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Text => write!(f, "text"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Date => write!(f, "date"),
            FieldType::Object => write!(f, "object"),
        }
    }
}

/// Schema information for one named value position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Key of the field; array elements share their array's name
    pub name: String,

    /// Observed kind, `None` until a non-null value has been seen
    #[serde(rename = "type", default)]
    pub field_type: Option<FieldType>,

    /// Some observed integer was negative
    #[serde(default)]
    pub signed: bool,

    /// Minimal width for the observed integers, 0 unless `field_type` is integer
    ///
    /// When signed and unsigned observations meet, the unsigned width moves
    /// up one bucket, so this may overestimate by one bucket.
    #[serde(default)]
    pub bits: u8,

    /// Character count of the longest observed string
    #[serde(default)]
    pub length: usize,

    /// Observed as an array at least once
    #[serde(default)]
    pub multiple: bool,

    /// Observed as null at least once
    #[serde(default)]
    pub nullable: bool,

    /// Sub-fields, present only for objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Field>>,
}

impl Field {
    /// Create a field with no observations yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a field of the given type
    pub fn typed(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type: Some(field_type),
            ..Default::default()
        }
    }

    /// Create an object field holding `fields`
    pub fn object(name: impl Into<String>, fields: BTreeMap<String, Field>) -> Self {
        Self {
            name: name.into(),
            field_type: Some(FieldType::Object),
            fields: Some(fields),
            ..Default::default()
        }
    }

    /// Only nulls have been seen here, so cardinality is still unknown
    pub fn is_unobserved(&self) -> bool {
        self.field_type.is_none() && !self.multiple && self.fields.is_none()
    }

    /// Get a sub-field
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.as_ref().and_then(|fields| fields.get(name))
    }

    /// Follow a dotted path through nested objects
    pub fn lookup(&self, path: &str) -> Option<&Field> {
        path.split('.').try_fold(self, |field, name| field.get(name))
    }
}

/// Top-level schema: one field per record key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub fields: BTreeMap<String, Field>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a top-level field
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Follow a dotted path, e.g. `"address.city"`
    pub fn lookup(&self, path: &str) -> Option<&Field> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let field = self.fields.get(head)?;
        match rest {
            Some(rest) => field.lookup(rest),
            None => Some(field),
        }
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl From<BTreeMap<String, Field>> for Schema {
    fn from(fields: BTreeMap<String, Field>) -> Self {
        Self { fields }
    }
}
