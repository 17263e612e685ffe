// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Lazy, chainable query builders evaluated against SphinxQL.
//!
//! A [`QuerySet`] is a short-lived, per-call builder: chaining methods
//! consume and return it, nothing touches the wire until one of the
//! evaluation methods runs. Schema mismatches (unknown columns, filtering
//! on a full-text-only field) surface at evaluation, not while chaining.

use std::sync::Arc;

use crate::driver::{ResultSet, Row, SphinxConnection};
use crate::error::Result;
use crate::ql::{Expr, Match, SelectStatement, SortKey};
use crate::schema::{Document, IndexSchema};

/// Applied when no explicit limit is set. searchd's implicit `LIMIT 20`
/// must never silently truncate results, so every statement carries an
/// explicit limit.
pub const DEFAULT_LIMIT: u64 = 1000;

#[derive(Debug, Clone)]
pub struct QuerySet {
    index: Arc<IndexSchema>,
    match_clause: Match,
    predicate: Option<Expr>,
    sort_keys: Vec<SortKey>,
    offset: u64,
    limit: Option<u64>,
    default_limit: u64,
}

impl QuerySet {
    pub fn new(index: Arc<IndexSchema>) -> Self {
        Self {
            index,
            match_clause: Match::default(),
            predicate: None,
            sort_keys: Vec::new(),
            offset: 0,
            limit: None,
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn index(&self) -> &IndexSchema {
        &self.index
    }

    /// Every record of the index. A no-op marker kept for parity with the
    /// manager surface.
    pub fn all(self) -> Self {
        self
    }

    /// Narrow by an attribute predicate. Multiple calls are ANDed.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    /// AND a batch of predicates in one call.
    pub fn filter_all(mut self, exprs: impl IntoIterator<Item = Expr>) -> Self {
        for expr in exprs {
            self = self.filter(expr);
        }
        self
    }

    /// Add full-text match terms. Metacharacters are escaped; repeated
    /// calls accumulate, space-joined.
    pub fn matching(mut self, text: &str) -> Self {
        self.match_clause.push_escaped(text);
        self
    }

    /// Add a full-text clause for callers using Sphinx extended query
    /// syntax deliberately. Metacharacters pass through; only single
    /// quotes are escaped, to keep the `MATCH('...')` literal intact.
    pub fn matching_raw(mut self, text: &str) -> Self {
        self.match_clause.push_raw(text);
        self
    }

    /// Append sort keys. An empty call clears all ordering.
    pub fn order_by(mut self, keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut added = false;
        for key in keys {
            self.sort_keys.push(key);
            added = true;
        }
        if !added {
            self.sort_keys.clear();
        }
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub(crate) fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    fn check_columns(&self) -> Result<()> {
        if let Some(expr) = &self.predicate {
            for column in expr.columns() {
                self.index.check_attribute(column)?;
            }
        }
        for key in &self.sort_keys {
            if let Some(column) = key.column() {
                self.index.check_attribute(column)?;
            }
        }
        Ok(())
    }

    fn statement(&self) -> SelectStatement<'_> {
        SelectStatement {
            index: self.index.name(),
            match_clause: &self.match_clause,
            predicate: self.predicate.as_ref(),
            sort_keys: &self.sort_keys,
            offset: self.offset,
            limit: self.limit.unwrap_or(self.default_limit),
        }
    }

    /// The SphinxQL this queryset evaluates to.
    pub fn sql(&self) -> Result<String> {
        self.check_columns()?;
        Ok(self.statement().to_sql())
    }

    /// Execute and return raw rows, with attribute cells normalized through
    /// the schema's field types (timestamps decoded to dates, and so on).
    pub fn fetch_rows<C: SphinxConnection>(&self, conn: &mut C) -> Result<Vec<Row>> {
        let sql = self.sql()?;
        tracing::debug!(index = self.index.name(), %sql, "executing sphinxql");
        let raw = conn.query(&sql)?;
        self.normalize(raw)
    }

    /// Execute and map each row onto a document instance.
    pub fn fetch<T: Document, C: SphinxConnection>(&self, conn: &mut C) -> Result<Vec<T>> {
        self.fetch_rows(conn)?.iter().map(T::from_row).collect()
    }

    /// Execute the `COUNT(*)` form of this queryset.
    pub fn count<C: SphinxConnection>(&self, conn: &mut C) -> Result<u64> {
        self.check_columns()?;
        let sql = self.statement().to_count_sql();
        tracing::debug!(index = self.index.name(), %sql, "executing sphinxql");
        let result = conn.query(&sql)?;
        Ok(result.scalar_i64()?.max(0) as u64)
    }

    /// Whether any record matches.
    pub fn exists<C: SphinxConnection>(&self, conn: &mut C) -> Result<bool> {
        let probe = self.clone().limit(1);
        Ok(!probe.fetch_rows(conn)?.is_empty())
    }

    /// The first matching document, if any.
    pub fn first<T: Document, C: SphinxConnection>(&self, conn: &mut C) -> Result<Option<T>> {
        let mut docs = self.clone().limit(1).fetch::<T, C>(conn)?;
        Ok(if docs.is_empty() {
            None
        } else {
            Some(docs.swap_remove(0))
        })
    }

    fn normalize(&self, raw: ResultSet) -> Result<Vec<Row>> {
        let columns: Vec<String> = raw.columns().to_vec();
        let mut out = ResultSet::new(columns.clone());
        for row in raw.rows() {
            let mut values = Vec::with_capacity(columns.len());
            for (column, cell) in columns.iter().zip(row.values()) {
                let value = match self.index.field(column) {
                    Some(field) => field.kind.decode(cell)?,
                    // id, WEIGHT() and other computed columns pass through
                    None => cell.clone(),
                };
                values.push(value);
            }
            out.push_row(values)?;
        }
        Ok(out.into_iter().collect())
    }
}

/// Convenience for decoding the implicit document id column.
pub fn row_id(row: &Row) -> Result<i64> {
    row.require("id")?.as_i64().ok_or_else(|| {
        crate::error::SphinxError::InvalidValue("document id is not an integer".into())
    })
}
