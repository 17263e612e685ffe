// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Convenience entry points over per-call querysets.

use std::sync::Arc;

use crate::config::Config;
use crate::ql::{Expr, SortKey};
use crate::queryset::QuerySet;
use crate::schema::IndexSchema;

/// The default entry point for querying an index.
///
/// Every call constructs a fresh [`QuerySet`] bound to the index and
/// forwards to it; managers hold no mutable state across calls. A manager
/// may carry a scope predicate that is ANDed into every queryset it hands
/// out, so an index can expose both a plain and a pre-narrowed entry point.
#[derive(Debug, Clone)]
pub struct Manager {
    index: Arc<IndexSchema>,
    scope: Option<Expr>,
    default_limit: Option<u64>,
}

impl Manager {
    pub fn new(index: Arc<IndexSchema>) -> Self {
        Self {
            index,
            scope: None,
            default_limit: None,
        }
    }

    /// A manager whose querysets are pre-narrowed by `scope`.
    pub fn scoped(index: Arc<IndexSchema>, scope: Expr) -> Self {
        Self {
            index,
            scope: Some(scope),
            default_limit: None,
        }
    }

    /// Override the limit applied when a queryset sets none.
    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = Some(limit);
        self
    }

    /// Pick up runtime settings, currently the default query limit.
    pub fn with_config(self, config: &Config) -> Self {
        self.with_default_limit(config.default_limit)
    }

    pub fn index(&self) -> &IndexSchema {
        &self.index
    }

    /// The fresh queryset underlying every entry point.
    pub fn queryset(&self) -> QuerySet {
        let mut qs = QuerySet::new(Arc::clone(&self.index));
        if let Some(limit) = self.default_limit {
            qs = qs.with_default_limit(limit);
        }
        match &self.scope {
            Some(expr) => qs.filter(expr.clone()),
            None => qs,
        }
    }

    pub fn all(&self) -> QuerySet {
        self.queryset().all()
    }

    pub fn filter(&self, expr: Expr) -> QuerySet {
        self.queryset().filter(expr)
    }

    pub fn filter_all(&self, exprs: impl IntoIterator<Item = Expr>) -> QuerySet {
        self.queryset().filter_all(exprs)
    }

    pub fn matching(&self, expression: &str) -> QuerySet {
        self.queryset().matching(expression)
    }

    pub fn order_by(&self, keys: impl IntoIterator<Item = SortKey>) -> QuerySet {
        self.queryset().order_by(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;
    use crate::ql::col;

    fn schema() -> Arc<IndexSchema> {
        Arc::new(
            IndexSchema::builder("document_index", "queryset_document")
                .field(Field::indexed_string("text", "text"))
                .field(Field::integer("number", "number"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_manager_matches_queryset() {
        let index = schema();
        let manager = Manager::new(Arc::clone(&index));

        let via_manager = manager.filter(col("number").gt(2)).sql().unwrap();
        let via_queryset = QuerySet::new(index).filter(col("number").gt(2)).sql().unwrap();
        assert_eq!(via_manager, via_queryset);
    }

    #[test]
    fn test_scoped_manager_narrows_every_call() {
        let manager = Manager::scoped(schema(), col("number").in_list([2, 4, 6]));
        assert_eq!(
            manager.all().sql().unwrap(),
            "SELECT * FROM document_index WHERE number IN (2, 4, 6) LIMIT 0, 1000"
        );
        assert_eq!(
            manager.matching("hello").sql().unwrap(),
            "SELECT * FROM document_index WHERE MATCH('hello') AND number IN (2, 4, 6) LIMIT 0, 1000"
        );
    }

    #[test]
    fn test_calls_do_not_share_state() {
        let manager = Manager::new(schema());
        let _ = manager.filter(col("number").eq(1));
        // A later call starts from a clean queryset.
        assert_eq!(
            manager.all().sql().unwrap(),
            "SELECT * FROM document_index LIMIT 0, 1000"
        );
    }

    #[test]
    fn test_default_limit_override() {
        let manager = Manager::new(schema()).with_default_limit(50);
        assert_eq!(
            manager.all().sql().unwrap(),
            "SELECT * FROM document_index LIMIT 0, 50"
        );
    }

    #[test]
    fn test_config_default_limit_applies() {
        let config = Config {
            default_limit: 25,
            ..Config::default()
        };
        let manager = Manager::new(schema()).with_config(&config);
        assert_eq!(
            manager.all().sql().unwrap(),
            "SELECT * FROM document_index LIMIT 0, 25"
        );
        // An explicit queryset limit still wins.
        assert_eq!(
            manager.all().limit(5).sql().unwrap(),
            "SELECT * FROM document_index LIMIT 0, 5"
        );
    }
}
