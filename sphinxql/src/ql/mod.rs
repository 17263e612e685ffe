// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! SphinxQL expression AST and statement writer.
//!
//! Querysets accumulate an [`Expr`] predicate, a [`Match`] clause, and
//! [`SortKey`]s; the writer renders them into the statement searchd
//! understands:
//!
//! ```text
//! SELECT * FROM document_index
//!     WHERE MATCH('hello') AND number > 2 AND number IN (2, 4, 6)
//!     ORDER BY number ASC, WEIGHT() DESC
//!     LIMIT 0, 1000
//! ```
//!
//! # Operators
//!
//! | Operator | Meaning | Rendered |
//! |----------|---------|----------|
//! | `eq` | Exact match | `number = 2` |
//! | `neq` | Not equal | `number != 2` |
//! | `gt`, `gte`, `lt`, `lte` | Range | `number > 2` |
//! | `in_list` | List membership | `number IN (2, 4, 6)` |
//! | `between` | Inclusive range | `number BETWEEN 1 AND 3` |
//! | `and`, `or`, `not` | Boolean combination | `(a AND b)` |
//!
//! The `MATCH(...)` clause always precedes attribute predicates; searchd
//! rejects statements with the clauses in any other order.

pub mod ast;
pub mod writer;

pub use ast::{col, Expr, Match, Operator, SortKey, SortOrder};
pub use writer::{escape_match, SelectStatement};
