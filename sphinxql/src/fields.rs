// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Typed field descriptors mapping index attributes to relational columns.
//!
//! | Kind | Full-text | Attribute | sphinx.conf directive |
//! |------|-----------|-----------|-----------------------|
//! | `String` | no | yes | `sql_attr_string` |
//! | `IndexedString` | yes | yes | `sql_field_string` |
//! | `Text` | yes | no | (query column only) |
//! | `Integer` | no | yes | `sql_attr_bigint` |
//! | `Float` | no | yes | `sql_attr_float` |
//! | `Bool` | no | yes | `sql_attr_bool` |
//! | `Date` | no | yes | `sql_attr_timestamp` |
//! | `DateTime` | no | yes | `sql_attr_timestamp` |

use serde::{Deserialize, Serialize};

use crate::error::{Result, SphinxError};
use crate::types::SphinxValue;

/// The kind of a declared index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    IndexedString,
    Text,
    Integer,
    Float,
    Bool,
    Date,
    DateTime,
}

impl FieldKind {
    /// Whether the field participates in full-text matching.
    pub fn is_indexed(self) -> bool {
        matches!(self, FieldKind::IndexedString | FieldKind::Text)
    }

    /// Whether the field is stored as an attribute (filterable, sortable,
    /// returned in result rows).
    pub fn is_attribute(self) -> bool {
        !matches!(self, FieldKind::Text)
    }

    /// The `sphinx.conf` source directive declaring this field, if any.
    /// `Text` columns are full-text only and need no directive.
    pub fn conf_directive(self) -> Option<&'static str> {
        match self {
            FieldKind::String => Some("sql_attr_string"),
            FieldKind::IndexedString => Some("sql_field_string"),
            FieldKind::Text => None,
            FieldKind::Integer => Some("sql_attr_bigint"),
            FieldKind::Float => Some("sql_attr_float"),
            FieldKind::Bool => Some("sql_attr_bool"),
            FieldKind::Date | FieldKind::DateTime => Some("sql_attr_timestamp"),
        }
    }

    /// Decode a raw searchd cell into the value domain of this field.
    ///
    /// searchd returns attributes as strings or integers depending on the
    /// client; timestamps always come back as unix seconds.
    pub fn decode(self, raw: &SphinxValue) -> Result<SphinxValue> {
        match self {
            FieldKind::String | FieldKind::IndexedString | FieldKind::Text => {
                match raw.as_str() {
                    Some(s) => Ok(SphinxValue::from(s)),
                    None => Err(decode_error(self, raw)),
                }
            }
            FieldKind::Integer => match raw.as_i64() {
                Some(n) => Ok(SphinxValue::from(n)),
                None => Err(decode_error(self, raw)),
            },
            FieldKind::Float => match raw.as_f64() {
                Some(f) => Ok(SphinxValue::from(f)),
                None => Err(decode_error(self, raw)),
            },
            FieldKind::Bool => match raw.as_bool() {
                Some(b) => Ok(SphinxValue::from(b)),
                None => Err(decode_error(self, raw)),
            },
            FieldKind::Date => match timestamp_of(raw) {
                Some(dt) => Ok(SphinxValue::from(dt.date_naive())),
                None => Err(decode_error(self, raw)),
            },
            FieldKind::DateTime => match timestamp_of(raw) {
                Some(dt) => Ok(SphinxValue::from(dt)),
                None => Err(decode_error(self, raw)),
            },
        }
    }
}

fn timestamp_of(raw: &SphinxValue) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Some(dt) = raw.as_datetime() {
        return Some(dt);
    }
    raw.as_i64()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
}

fn decode_error(kind: FieldKind, raw: &SphinxValue) -> SphinxError {
    SphinxError::InvalidValue(format!("cannot decode {raw:?} as {kind:?}"))
}

/// A declared index field: an attribute name plus the relational column
/// (`model_attr`) it is sourced from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub model_attr: String,
}

impl Field {
    pub fn new(name: &str, kind: FieldKind, model_attr: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            model_attr: model_attr.to_string(),
        }
    }

    pub fn string(name: &str, model_attr: &str) -> Self {
        Self::new(name, FieldKind::String, model_attr)
    }

    pub fn indexed_string(name: &str, model_attr: &str) -> Self {
        Self::new(name, FieldKind::IndexedString, model_attr)
    }

    pub fn text(name: &str, model_attr: &str) -> Self {
        Self::new(name, FieldKind::Text, model_attr)
    }

    pub fn integer(name: &str, model_attr: &str) -> Self {
        Self::new(name, FieldKind::Integer, model_attr)
    }

    pub fn float(name: &str, model_attr: &str) -> Self {
        Self::new(name, FieldKind::Float, model_attr)
    }

    pub fn bool(name: &str, model_attr: &str) -> Self {
        Self::new(name, FieldKind::Bool, model_attr)
    }

    pub fn date(name: &str, model_attr: &str) -> Self {
        Self::new(name, FieldKind::Date, model_attr)
    }

    pub fn datetime(name: &str, model_attr: &str) -> Self {
        Self::new(name, FieldKind::DateTime, model_attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_indexed_only() {
        assert!(FieldKind::Text.is_indexed());
        assert!(!FieldKind::Text.is_attribute());
        assert_eq!(FieldKind::Text.conf_directive(), None);
    }

    #[test]
    fn test_indexed_string_is_both() {
        assert!(FieldKind::IndexedString.is_indexed());
        assert!(FieldKind::IndexedString.is_attribute());
        assert_eq!(
            FieldKind::IndexedString.conf_directive(),
            Some("sql_field_string")
        );
    }

    #[test]
    fn test_decode_timestamp_to_date() {
        // 2024-01-15T00:00:00Z
        let raw = SphinxValue::from(1705276800i64);
        let decoded = FieldKind::Date.decode(&raw).unwrap();
        let date = decoded.as_date().unwrap();
        assert_eq!(date.to_string(), "2024-01-15");
    }

    #[test]
    fn test_decode_rejects_mismatched_type() {
        let raw = SphinxValue::from("not a number");
        assert!(FieldKind::Integer.decode(&raw).is_err());
    }
}
