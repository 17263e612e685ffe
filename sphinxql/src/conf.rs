// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

//! `sphinx.conf` generation: one `source`/`index` block pair per declared
//! index, plus `indexer` and `searchd` sections, fed from the relational
//! database the indexer reads.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{Config, DatabaseSettings};
use crate::error::{Result, SphinxError};
use crate::schema::IndexSchema;

/// The database vendors Sphinx can index from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseVendor {
    Postgres,
    Mysql,
}

impl DatabaseVendor {
    /// Parse the framework-style vendor string (`postgresql`, `mysql`).
    pub fn from_vendor_string(vendor: &str) -> Result<Self> {
        match vendor {
            "postgresql" => Ok(Self::Postgres),
            "mysql" => Ok(Self::Mysql),
            other => Err(SphinxError::UnsupportedVendor(other.to_string())),
        }
    }

    /// The `type` value in a sphinx source block.
    pub fn sphinx_type(self) -> &'static str {
        match self {
            Self::Postgres => "pgsql",
            Self::Mysql => "mysql",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Self::Postgres => 5432,
            Self::Mysql => 3306,
        }
    }

    /// Quote a SQL identifier for this vendor.
    pub fn quote_ident(self, ident: &str) -> String {
        match self {
            Self::Postgres => format!("\"{ident}\""),
            Self::Mysql => format!("`{ident}`"),
        }
    }

    /// An expression casting a hex CHAR primary-key column to the integer
    /// document id Sphinx requires. Used to build `sql_query` overrides for
    /// tables whose primary key is not numeric.
    pub fn hex_pk_cast(self, column: &str) -> String {
        match self {
            Self::Postgres => {
                format!("CAST(CAST(CONCAT('x', {column}) AS BIT(32)) AS INT)")
            }
            Self::Mysql => format!("CONV({column}, 16, 10)"),
        }
    }
}

/// Renders the complete configuration for a set of indexes.
#[derive(Debug, Clone)]
pub struct SphinxConf {
    config: Config,
    db: DatabaseSettings,
    indexes: Vec<Arc<IndexSchema>>,
}

impl SphinxConf {
    pub fn new(config: Config, db: DatabaseSettings) -> Self {
        Self {
            config,
            db,
            indexes: Vec::new(),
        }
    }

    pub fn register(&mut self, index: Arc<IndexSchema>) {
        self.indexes.push(index);
    }

    /// The generated `sql_query` for an index, unless the schema overrides
    /// it: primary key first, then every declared column in order, aliased
    /// to its attribute name where the two differ.
    pub fn sql_query(&self, index: &IndexSchema) -> String {
        if let Some(query) = &index.source_options().sql_query {
            return query.clone();
        }
        let vendor = self.db.vendor;
        let mut columns = vec![vendor.quote_ident(index.pk_column())];
        for field in index.fields() {
            let column = vendor.quote_ident(&field.model_attr);
            if field.model_attr == field.name {
                columns.push(column);
            } else {
                columns.push(format!("{} AS {}", column, vendor.quote_ident(&field.name)));
            }
        }
        format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            vendor.quote_ident(index.table())
        )
    }

    fn render_source(&self, index: &IndexSchema, out: &mut String) {
        let _ = writeln!(out, "source {}\n{{", index.name());
        let _ = writeln!(out, "    type = {}", self.db.vendor.sphinx_type());
        let _ = writeln!(out, "    sql_host = {}", self.db.host);
        let _ = writeln!(out, "    sql_port = {}", self.db.port);
        let _ = writeln!(out, "    sql_user = {}", self.db.user);
        let _ = writeln!(out, "    sql_pass = {}", self.db.password);
        let _ = writeln!(out, "    sql_db = {}", self.db.name);
        let _ = writeln!(out, "    sql_query = {}", self.sql_query(index));
        for field in index.fields() {
            if let Some(directive) = field.kind.conf_directive() {
                let _ = writeln!(out, "    {} = {}", directive, field.name);
            }
        }
        let _ = writeln!(out, "}}\n");
    }

    fn render_index(&self, index: &IndexSchema, out: &mut String) {
        let path = self.config.data_dir.join(index.name());
        let _ = writeln!(out, "index {}\n{{", index.name());
        let _ = writeln!(out, "    source = {}", index.name());
        let _ = writeln!(out, "    path = {}", path.display());
        let _ = writeln!(out, "}}\n");
    }

    /// Render the full `sphinx.conf` text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for index in &self.indexes {
            self.render_source(index, &mut out);
            self.render_index(index, &mut out);
        }

        let _ = writeln!(out, "indexer\n{{");
        let _ = writeln!(out, "    mem_limit = 256M");
        let _ = writeln!(out, "}}\n");

        let _ = writeln!(out, "searchd\n{{");
        let _ = writeln!(
            out,
            "    listen = {}:mysql41",
            self.config.searchd_addr
        );
        let _ = writeln!(
            out,
            "    pid_file = {}",
            self.config.data_dir.join("searchd.pid").display()
        );
        let _ = writeln!(
            out,
            "    log = {}",
            self.config.data_dir.join("searchd.log").display()
        );
        let _ = writeln!(
            out,
            "    query_log = {}",
            self.config.data_dir.join("query.log").display()
        );
        let _ = writeln!(out, "}}");
        out
    }

    /// Render and write `sphinx.conf` at `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())?;
        tracing::info!(
            indexes = self.indexes.len(),
            path = %path.display(),
            "wrote sphinx.conf"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Field;

    fn settings(vendor: DatabaseVendor) -> DatabaseSettings {
        DatabaseSettings {
            vendor,
            host: "127.0.0.1".to_string(),
            port: vendor.default_port(),
            user: "sphinx".to_string(),
            password: String::new(),
            name: "sphinx".to_string(),
        }
    }

    fn document_index() -> Arc<IndexSchema> {
        Arc::new(
            IndexSchema::builder("document_index", "queryset_document")
                .field(Field::string("summary", "summary"))
                .field(Field::indexed_string("text", "text"))
                .field(Field::date("date", "date"))
                .field(Field::integer("number", "number"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_vendor_parsing() {
        assert_eq!(
            DatabaseVendor::from_vendor_string("postgresql").unwrap(),
            DatabaseVendor::Postgres
        );
        assert_eq!(
            DatabaseVendor::from_vendor_string("mysql").unwrap(),
            DatabaseVendor::Mysql
        );
        assert!(matches!(
            DatabaseVendor::from_vendor_string("sqlite").unwrap_err(),
            SphinxError::UnsupportedVendor(_)
        ));
    }

    #[test]
    fn test_hex_pk_cast_per_vendor() {
        assert_eq!(
            DatabaseVendor::Postgres.hex_pk_cast("id"),
            "CAST(CAST(CONCAT('x', id) AS BIT(32)) AS INT)"
        );
        assert_eq!(DatabaseVendor::Mysql.hex_pk_cast("id"), "CONV(id, 16, 10)");
    }

    #[test]
    fn test_generated_sql_query_postgres() {
        let conf = SphinxConf::new(Config::default(), settings(DatabaseVendor::Postgres));
        assert_eq!(
            conf.sql_query(&document_index()),
            r#"SELECT "id", "summary", "text", "date", "number" FROM "queryset_document""#
        );
    }

    #[test]
    fn test_generated_sql_query_mysql_with_alias() {
        let index = Arc::new(
            IndexSchema::builder("char_pk_index", "queryset_charprimarykeydocument")
                .field(Field::string("uid", "id"))
                .field(Field::text("text", "text"))
                .build()
                .unwrap(),
        );
        let conf = SphinxConf::new(Config::default(), settings(DatabaseVendor::Mysql));
        assert_eq!(
            conf.sql_query(&index),
            "SELECT `id`, `id` AS `uid`, `text` FROM `queryset_charprimarykeydocument`"
        );
    }

    #[test]
    fn test_sql_query_override_wins() {
        let index = Arc::new(
            IndexSchema::builder("char_pk_index", "queryset_charprimarykeydocument")
                .field(Field::string("uid", "id"))
                .field(Field::text("text", "text"))
                .sql_query("SELECT CONV(id, 16, 10) AS id, id AS uid, `text` FROM queryset_charprimarykeydocument")
                .build()
                .unwrap(),
        );
        let conf = SphinxConf::new(Config::default(), settings(DatabaseVendor::Mysql));
        assert!(conf.sql_query(&index).starts_with("SELECT CONV(id, 16, 10)"));
    }

    #[test]
    fn test_source_block_directives() {
        let mut conf = SphinxConf::new(Config::default(), settings(DatabaseVendor::Postgres));
        conf.register(document_index());
        let text = conf.render();
        assert!(text.contains("source document_index"));
        assert!(text.contains("    type = pgsql"));
        assert!(text.contains("    sql_attr_string = summary"));
        assert!(text.contains("    sql_field_string = text"));
        assert!(text.contains("    sql_attr_timestamp = date"));
        assert!(text.contains("    sql_attr_bigint = number"));
        assert!(text.contains("index document_index"));
        assert!(text.contains("listen = 127.0.0.1:9306:mysql41"));
    }
}
