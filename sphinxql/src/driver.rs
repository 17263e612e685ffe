// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! The connection seam to searchd.
//!
//! SphinxQL rides the MySQL wire protocol, which this crate deliberately
//! does not implement; any MySQL-capable driver can back
//! [`SphinxConnection`]. Tests use an in-memory double.

use std::sync::Arc;

use crate::error::{Result, SphinxError};
use crate::types::SphinxValue;

/// A live connection able to execute SphinxQL text and return rows.
pub trait SphinxConnection {
    fn query(&mut self, sql: &str) -> Result<ResultSet>;
}

/// Column header + rows for one statement.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let columns: Arc<[String]> = columns.into_iter().map(Into::into).collect();
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, values: Vec<SphinxValue>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(SphinxError::Driver(format!(
                "row width {} does not match {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        self.rows.push(Row {
            columns: Arc::clone(&self.columns),
            values,
        });
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The single scalar of a one-row, one-column result (`COUNT(*)`).
    pub fn scalar_i64(&self) -> Result<i64> {
        let row = self
            .rows
            .first()
            .ok_or_else(|| SphinxError::Driver("empty result for scalar query".into()))?;
        row.values
            .first()
            .and_then(|v| v.as_i64())
            .ok_or_else(|| SphinxError::Driver("non-integer scalar result".into()))
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// One result row with by-name access. The column header is shared across
/// all rows of a result set.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<SphinxValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&SphinxValue> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Like [`get`](Self::get) but surfaces a missing column as an error.
    pub fn require(&self, column: &str) -> Result<&SphinxValue> {
        self.get(column)
            .ok_or_else(|| SphinxError::UnknownColumn(format!("result has no column '{column}'")))
    }

    pub fn values(&self) -> &[SphinxValue] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_by_name_access() {
        let mut rs = ResultSet::new(["id", "number"]);
        rs.push_row(vec![SphinxValue::from(1), SphinxValue::from(42)])
            .unwrap();
        let row = &rs.rows()[0];
        assert_eq!(row.get("number").and_then(|v| v.as_i64()), Some(42));
        assert!(row.get("missing").is_none());
        assert!(row.require("missing").is_err());
    }

    #[test]
    fn test_row_width_mismatch_rejected() {
        let mut rs = ResultSet::new(["id", "number"]);
        let err = rs.push_row(vec![SphinxValue::from(1)]).unwrap_err();
        assert!(matches!(err, SphinxError::Driver(_)));
    }

    #[test]
    fn test_scalar() {
        let mut rs = ResultSet::new(["count(*)"]);
        rs.push_row(vec![SphinxValue::from(7)]).unwrap();
        assert_eq!(rs.scalar_i64().unwrap(), 7);
    }
}
