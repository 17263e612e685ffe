// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Rendering of SphinxQL `SELECT` statements from accumulated query state.

use std::fmt::Write;
use std::sync::OnceLock;

use regex::Regex;

use super::ast::{Expr, Match, Operator, SortKey, SortOrder};

/// Characters with query-syntax meaning inside `MATCH('...')`.
///
/// Single quotes are not in this class: they are escaped separately so the
/// match text cannot terminate the surrounding string literal.
fn match_metachars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[\\()|\-!@~"&/^$<=>]"#).expect("valid regex"))
}

/// Backslash-escape Sphinx extended-query-syntax metacharacters so user
/// text is matched verbatim.
pub fn escape_match(text: &str) -> String {
    let escaped = match_metachars().replace_all(text, r"\$0");
    escaped.replace('\'', r"\'")
}

/// A fully-accumulated statement, ready to render.
#[derive(Debug, Clone)]
pub struct SelectStatement<'a> {
    pub index: &'a str,
    pub match_clause: &'a Match,
    pub predicate: Option<&'a Expr>,
    pub sort_keys: &'a [SortKey],
    pub offset: u64,
    pub limit: u64,
}

impl SelectStatement<'_> {
    /// Render `SELECT * FROM ...`.
    pub fn to_sql(&self) -> String {
        self.render("*", true)
    }

    /// Render the `SELECT COUNT(*)` form of the same statement. Ordering
    /// and limits are dropped; they cannot change the count.
    pub fn to_count_sql(&self) -> String {
        self.render("COUNT(*)", false)
    }

    fn render(&self, projection: &str, with_order_and_limit: bool) -> String {
        let mut sql = format!("SELECT {} FROM {}", projection, self.index);

        let mut clauses: Vec<String> = Vec::new();
        if !self.match_clause.is_empty() {
            // MATCH must come first; searchd rejects any other ordering.
            clauses.push(format!("MATCH('{}')", self.match_clause.text()));
        }
        if let Some(expr) = self.predicate {
            // When joined to MATCH with AND, a top-level OR must keep its
            // parentheses or rows escape the full-text clause.
            clauses.push(write_expr(expr, !clauses.is_empty()));
        }
        if !clauses.is_empty() {
            let _ = write!(sql, " WHERE {}", clauses.join(" AND "));
        }

        if with_order_and_limit {
            if !self.sort_keys.is_empty() {
                let keys: Vec<String> = self.sort_keys.iter().map(write_sort_key).collect();
                let _ = write!(sql, " ORDER BY {}", keys.join(", "));
            }
            let _ = write!(sql, " LIMIT {}, {}", self.offset, self.limit);
        }

        sql
    }
}

fn write_sort_key(key: &SortKey) -> String {
    match key {
        SortKey::Column { name, order } => format!("{} {}", name, write_order(*order)),
        SortKey::Weight { order } => format!("WEIGHT() {}", write_order(*order)),
    }
}

fn write_order(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

/// Render a predicate. `nested` controls parenthesization: boolean
/// combinations are wrapped only when they appear inside another
/// expression.
fn write_expr(expr: &Expr, nested: bool) -> String {
    match expr {
        Expr::And { left, right } => {
            let body = format!("{} AND {}", write_expr(left, true), write_expr(right, true));
            if nested {
                format!("({body})")
            } else {
                body
            }
        }
        Expr::Or { left, right } => {
            let body = format!("{} OR {}", write_expr(left, true), write_expr(right, true));
            if nested {
                format!("({body})")
            } else {
                body
            }
        }
        Expr::Not { inner } => format!("NOT ({})", write_expr(inner, false)),
        Expr::Comparison {
            column,
            operator,
            value,
        } => format!("{} {} {}", column, operator.as_str(), value.literal()),
        Expr::InList { column, values } => {
            let list: Vec<String> = values.iter().map(|v| v.literal()).collect();
            format!("{} {} ({})", column, Operator::In.as_str(), list.join(", "))
        }
        Expr::Between { column, low, high } => format!(
            "{} {} {} AND {}",
            column,
            Operator::Between.as_str(),
            low.literal(),
            high.literal()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ql::ast::col;

    fn stmt<'a>(m: &'a Match, predicate: Option<&'a Expr>, keys: &'a [SortKey]) -> String {
        SelectStatement {
            index: "document_index",
            match_clause: m,
            predicate,
            sort_keys: keys,
            offset: 0,
            limit: 1000,
        }
        .to_sql()
    }

    #[test]
    fn test_bare_select() {
        let m = Match::default();
        assert_eq!(
            stmt(&m, None, &[]),
            "SELECT * FROM document_index LIMIT 0, 1000"
        );
    }

    #[test]
    fn test_match_precedes_predicate() {
        let mut m = Match::default();
        m.push_escaped("hello");
        let expr = col("number").gt(2);
        assert_eq!(
            stmt(&m, Some(&expr), &[]),
            "SELECT * FROM document_index WHERE MATCH('hello') AND number > 2 LIMIT 0, 1000"
        );
    }

    #[test]
    fn test_in_list_and_order() {
        let m = Match::default();
        let expr = col("number").in_list([2, 4, 6]);
        let keys = [SortKey::asc("number"), SortKey::weight()];
        assert_eq!(
            stmt(&m, Some(&expr), &keys),
            "SELECT * FROM document_index WHERE number IN (2, 4, 6) \
             ORDER BY number ASC, WEIGHT() DESC LIMIT 0, 1000"
        );
    }

    #[test]
    fn test_or_predicate_parenthesized_next_to_match() {
        let mut m = Match::default();
        m.push_escaped("hello");
        let expr = col("a").eq(1).or(col("b").eq(2));
        assert_eq!(
            stmt(&m, Some(&expr), &[]),
            "SELECT * FROM document_index WHERE MATCH('hello') AND (a = 1 OR b = 2) LIMIT 0, 1000"
        );
        let count = SelectStatement {
            index: "document_index",
            match_clause: &m,
            predicate: Some(&expr),
            sort_keys: &[],
            offset: 0,
            limit: 1000,
        }
        .to_count_sql();
        assert_eq!(
            count,
            "SELECT COUNT(*) FROM document_index WHERE MATCH('hello') AND (a = 1 OR b = 2)"
        );
    }

    #[test]
    fn test_lone_or_predicate_stays_flat() {
        let m = Match::default();
        let expr = col("a").eq(1).or(col("b").eq(2));
        assert_eq!(
            stmt(&m, Some(&expr), &[]),
            "SELECT * FROM document_index WHERE a = 1 OR b = 2 LIMIT 0, 1000"
        );
    }

    #[test]
    fn test_nested_boolean_parenthesization() {
        let m = Match::default();
        let expr = col("a").eq(1).or(col("b").eq(2)).and(col("c").eq(3));
        assert_eq!(
            stmt(&m, Some(&expr), &[]),
            "SELECT * FROM document_index WHERE (a = 1 OR b = 2) AND c = 3 LIMIT 0, 1000"
        );
    }

    #[test]
    fn test_between_and_not() {
        let m = Match::default();
        let expr = col("number").between(1, 3).not();
        assert_eq!(
            stmt(&m, Some(&expr), &[]),
            "SELECT * FROM document_index WHERE NOT (number BETWEEN 1 AND 3) LIMIT 0, 1000"
        );
    }

    #[test]
    fn test_count_drops_order_and_limit() {
        let m = Match::default();
        let expr = col("number").gt(2);
        let sql = SelectStatement {
            index: "document_index",
            match_clause: &m,
            predicate: Some(&expr),
            sort_keys: &[SortKey::asc("number")],
            offset: 10,
            limit: 5,
        }
        .to_count_sql();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM document_index WHERE number > 2"
        );
    }

    #[test]
    fn test_escape_match_metachars() {
        assert_eq!(escape_match("hello@world"), r"hello\@world");
        assert_eq!(escape_match(r#"a "quoted" -term"#), r#"a \"quoted\" \-term"#);
        assert_eq!(escape_match("it's"), r"it\'s");
        assert_eq!(escape_match(r"back\slash"), r"back\\slash");
    }

    #[test]
    fn test_string_predicate_quoting() {
        let m = Match::default();
        let expr = col("summary").eq("it's fine");
        assert_eq!(
            stmt(&m, Some(&expr), &[]),
            r"SELECT * FROM document_index WHERE summary = 'it\'s fine' LIMIT 0, 1000"
        );
    }
}
