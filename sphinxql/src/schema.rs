// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! Declarative index schemas: the mapping from a relational table to a
//! Sphinx search index, built once at load time and immutable thereafter.

use serde::{Deserialize, Serialize};

use crate::driver::Row;
use crate::error::{Result, SphinxError};
use crate::fields::Field;

/// Per-index overrides for how the indexer sources rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceOptions {
    /// Replaces the generated `sql_query` wholesale. Required when the
    /// relational primary key is not an integer (see
    /// [`DatabaseVendor::hex_pk_cast`](crate::conf::DatabaseVendor::hex_pk_cast)).
    pub sql_query: Option<String>,
}

/// An immutable index schema: name, source table, declared fields, and the
/// primary-key column feeding the Sphinx document id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSchema {
    name: String,
    table: String,
    fields: Vec<Field>,
    pk_column: String,
    source: SourceOptions,
}

impl IndexSchema {
    pub fn builder(name: &str, table: &str) -> IndexSchemaBuilder {
        IndexSchemaBuilder {
            name: name.to_string(),
            table: table.to_string(),
            fields: Vec::new(),
            pk_column: "id".to_string(),
            source: SourceOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn pk_column(&self) -> &str {
        &self.pk_column
    }

    pub fn source_options(&self) -> &SourceOptions {
        &self.source
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Attribute fields, in declaration order. These are the columns a
    /// `SELECT *` against searchd returns after the document id.
    pub fn attributes(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind.is_attribute())
    }

    /// Fails unless `name` is a filterable/sortable attribute of this index.
    pub fn check_attribute(&self, name: &str) -> Result<()> {
        match self.field(name) {
            Some(f) if f.kind.is_attribute() => Ok(()),
            Some(f) => Err(SphinxError::UnknownColumn(format!(
                "'{}' is a full-text field of index '{}', not a filterable attribute",
                f.name, self.name
            ))),
            None => Err(SphinxError::UnknownColumn(format!(
                "index '{}' has no field '{}'",
                self.name, name
            ))),
        }
    }
}

/// Builder for [`IndexSchema`]. Validation happens in [`build`](Self::build):
/// duplicate field names, a field shadowing the reserved `id` column, and
/// indexes with no full-text field are all rejected.
#[derive(Debug)]
pub struct IndexSchemaBuilder {
    name: String,
    table: String,
    fields: Vec<Field>,
    pk_column: String,
    source: SourceOptions,
}

impl IndexSchemaBuilder {
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn pk_column(mut self, column: &str) -> Self {
        self.pk_column = column.to_string();
        self
    }

    pub fn sql_query(mut self, query: &str) -> Self {
        self.source.sql_query = Some(query.to_string());
        self
    }

    pub fn build(self) -> Result<IndexSchema> {
        for (i, field) in self.fields.iter().enumerate() {
            if field.name == "id" {
                return Err(SphinxError::Schema(format!(
                    "index '{}': 'id' is reserved for the document id",
                    self.name
                )));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(SphinxError::Schema(format!(
                    "index '{}': duplicate field '{}'",
                    self.name, field.name
                )));
            }
        }
        if !self.fields.iter().any(|f| f.kind.is_indexed()) {
            return Err(SphinxError::Schema(format!(
                "index '{}' declares no full-text field",
                self.name
            )));
        }
        Ok(IndexSchema {
            name: self.name,
            table: self.table,
            fields: self.fields,
            pk_column: self.pk_column,
            source: self.source,
        })
    }
}

/// A user document type tied to an index schema.
///
/// `from_row` maps a searchd result row back onto an instance; the row is
/// keyed by attribute name plus the implicit `id` column.
pub trait Document: Sized {
    fn schema() -> &'static IndexSchema;

    fn from_row(row: &Row) -> Result<Self>;
}
