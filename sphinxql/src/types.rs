// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Value types flowing between expressions, rendered literals, and result rows.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A SphinxQL-representable value.
///
/// Sphinx stores dates and datetimes as unix timestamps, so both variants
/// render to integer literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SphinxValue {
    String { value: String },
    Int { value: i64 },
    Float { value: f64 },
    Bool { value: bool },
    Date { value: NaiveDate },
    DateTime { value: DateTime<Utc> },
}

impl SphinxValue {
    /// Render as a SphinxQL literal.
    ///
    /// Strings are single-quoted with `\` and `'` backslash-escaped, so the
    /// output can never break out of its quoting context.
    pub fn literal(&self) -> String {
        match self {
            SphinxValue::String { value } => format!("'{}'", escape_string(value)),
            SphinxValue::Int { value } => value.to_string(),
            SphinxValue::Float { value } => value.to_string(),
            SphinxValue::Bool { value } => if *value { "1" } else { "0" }.to_string(),
            SphinxValue::Date { value } => date_to_timestamp(*value).to_string(),
            SphinxValue::DateTime { value } => value.timestamp().to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SphinxValue::String { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SphinxValue::Int { value } => Some(*value),
            SphinxValue::Bool { value } => Some(i64::from(*value)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SphinxValue::Float { value } => Some(*value),
            SphinxValue::Int { value } => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SphinxValue::Bool { value } => Some(*value),
            SphinxValue::Int { value } => Some(*value != 0),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            SphinxValue::Date { value } => Some(*value),
            SphinxValue::DateTime { value } => Some(value.date_naive()),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            SphinxValue::DateTime { value } => Some(*value),
            SphinxValue::Date { value } => Some(midnight_utc(*value)),
            _ => None,
        }
    }
}

impl From<&str> for SphinxValue {
    fn from(value: &str) -> Self {
        SphinxValue::String { value: value.to_string() }
    }
}

impl From<String> for SphinxValue {
    fn from(value: String) -> Self {
        SphinxValue::String { value }
    }
}

impl From<i64> for SphinxValue {
    fn from(value: i64) -> Self {
        SphinxValue::Int { value }
    }
}

impl From<i32> for SphinxValue {
    fn from(value: i32) -> Self {
        SphinxValue::Int { value: i64::from(value) }
    }
}

impl From<f64> for SphinxValue {
    fn from(value: f64) -> Self {
        SphinxValue::Float { value }
    }
}

impl From<bool> for SphinxValue {
    fn from(value: bool) -> Self {
        SphinxValue::Bool { value }
    }
}

impl From<NaiveDate> for SphinxValue {
    fn from(value: NaiveDate) -> Self {
        SphinxValue::Date { value }
    }
}

impl From<DateTime<Utc>> for SphinxValue {
    fn from(value: DateTime<Utc>) -> Self {
        SphinxValue::DateTime { value }
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    // and_hms_opt(0, 0, 0) is always valid
    let dt = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&dt)
}

fn date_to_timestamp(date: NaiveDate) -> i64 {
    midnight_utc(date).timestamp()
}
