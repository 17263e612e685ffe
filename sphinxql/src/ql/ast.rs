// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! SphinxQL expression AST types.

use serde::{Deserialize, Serialize};

use crate::types::SphinxValue;

/// Comparison operators usable against index attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,      // =
    Neq,     // !=
    Gt,      // >
    Gte,     // >=
    Lt,      // <
    Lte,     // <=
    In,      // IN
    Between, // BETWEEN
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "IN",
            Self::Between => "BETWEEN",
        }
    }
}

/// Predicate node over index attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    And {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not {
        inner: Box<Expr>,
    },
    Comparison {
        column: String,
        operator: Operator,
        value: SphinxValue,
    },
    InList {
        column: String,
        values: Vec<SphinxValue>,
    },
    Between {
        column: String,
        low: SphinxValue,
        high: SphinxValue,
    },
}

impl Expr {
    pub fn and(self, other: Expr) -> Expr {
        Expr::And {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn or(self, other: Expr) -> Expr {
        Expr::Or {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Expr {
        Expr::Not {
            inner: Box::new(self),
        }
    }

    /// Columns referenced anywhere in the expression, for schema checking.
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::And { left, right } | Expr::Or { left, right } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expr::Not { inner } => inner.collect_columns(out),
            Expr::Comparison { column, .. }
            | Expr::InList { column, .. }
            | Expr::Between { column, .. } => out.push(column),
        }
    }
}

/// Entry point for building comparisons: `col("number").gt(2)`.
pub fn col(name: &str) -> Column {
    Column {
        name: name.to_string(),
    }
}

/// A named attribute column, ready to be compared against a value.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
}

impl Column {
    fn cmp(self, operator: Operator, value: impl Into<SphinxValue>) -> Expr {
        Expr::Comparison {
            column: self.name,
            operator,
            value: value.into(),
        }
    }

    pub fn eq(self, value: impl Into<SphinxValue>) -> Expr {
        self.cmp(Operator::Eq, value)
    }

    pub fn neq(self, value: impl Into<SphinxValue>) -> Expr {
        self.cmp(Operator::Neq, value)
    }

    pub fn gt(self, value: impl Into<SphinxValue>) -> Expr {
        self.cmp(Operator::Gt, value)
    }

    pub fn gte(self, value: impl Into<SphinxValue>) -> Expr {
        self.cmp(Operator::Gte, value)
    }

    pub fn lt(self, value: impl Into<SphinxValue>) -> Expr {
        self.cmp(Operator::Lt, value)
    }

    pub fn lte(self, value: impl Into<SphinxValue>) -> Expr {
        self.cmp(Operator::Lte, value)
    }

    pub fn in_list<V: Into<SphinxValue>>(self, values: impl IntoIterator<Item = V>) -> Expr {
        Expr::InList {
            column: self.name,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn between(self, low: impl Into<SphinxValue>, high: impl Into<SphinxValue>) -> Expr {
        Expr::Between {
            column: self.name,
            low: low.into(),
            high: high.into(),
        }
    }
}

/// Accumulated full-text clause. Terms are space-joined; escaped terms have
/// Sphinx query-syntax metacharacters backslashed, raw terms pass through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Match {
    terms: Vec<String>,
}

impl Match {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn push_escaped(&mut self, text: &str) {
        self.terms.push(super::writer::escape_match(text));
    }

    /// Query-syntax metacharacters pass through untouched; single quotes
    /// are still escaped so the term cannot terminate the surrounding
    /// `MATCH('...')` string literal.
    pub fn push_raw(&mut self, text: &str) {
        self.terms.push(text.replace('\'', "\\'"));
    }

    /// The match text as placed inside `MATCH('...')`.
    pub fn text(&self) -> String {
        self.terms.join(" ")
    }
}

/// Sort direction for an `ORDER BY` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A single `ORDER BY` key: an attribute column or `WEIGHT()` relevance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SortKey {
    Column { name: String, order: SortOrder },
    Weight { order: SortOrder },
}

impl SortKey {
    pub fn asc(name: &str) -> Self {
        SortKey::Column {
            name: name.to_string(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(name: &str) -> Self {
        SortKey::Column {
            name: name.to_string(),
            order: SortOrder::Desc,
        }
    }

    /// Relevance order, best match first.
    pub fn weight() -> Self {
        SortKey::Weight {
            order: SortOrder::Desc,
        }
    }

    pub fn column(&self) -> Option<&str> {
        match self {
            SortKey::Column { name, .. } => Some(name),
            SortKey::Weight { .. } => None,
        }
    }
}
