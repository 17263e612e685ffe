// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Declarative Sphinx index mapping and SphinxQL query building.
//!
//! Index schemas declare how a relational table maps into a Sphinx search
//! index; [`Manager`](manager::Manager) and [`QuerySet`](queryset::QuerySet)
//! build SphinxQL `SELECT` statements against it and map result rows back
//! onto document types. The wire protocol to searchd lives behind
//! [`SphinxConnection`](driver::SphinxConnection).

pub mod conf;
pub mod config;
pub mod driver;
pub mod error;
pub mod fields;
pub mod manager;
pub mod ql;
pub mod queryset;
pub mod schema;
pub mod types;

pub use conf::{DatabaseVendor, SphinxConf};
pub use config::{Config, DatabaseSettings};
pub use driver::{ResultSet, Row, SphinxConnection};
pub use error::{Result, SphinxError};
pub use fields::{Field, FieldKind};
pub use manager::Manager;
pub use ql::{col, Expr, Match, Operator, SortKey, SortOrder};
pub use queryset::{row_id, QuerySet, DEFAULT_LIMIT};
pub use schema::{Document, IndexSchema, SourceOptions};
pub use types::SphinxValue;
