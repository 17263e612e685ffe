// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

use crate::conf::DatabaseVendor;
use crate::error::Result;

/// Runtime settings for talking to searchd and laying out index files.
#[derive(Debug, Clone)]
pub struct Config {
    pub searchd_addr: String,
    pub data_dir: PathBuf,
    pub default_limit: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let searchd_addr =
            env::var("SPHINXQL_SEARCHD").unwrap_or_else(|_| "127.0.0.1:9306".to_string());
        let data_dir = env::var("SPHINXQL_DATA_DIR").unwrap_or_else(|_| "./sphinx".to_string());
        let default_limit = env::var("SPHINXQL_DEFAULT_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);
        Self {
            searchd_addr,
            data_dir: PathBuf::from(data_dir),
            default_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            searchd_addr: "127.0.0.1:9306".to_string(),
            data_dir: PathBuf::from("./sphinx"),
            default_limit: 1000,
        }
    }
}

/// Connection settings for the relational database the indexer reads from.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub vendor: DatabaseVendor,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseSettings {
    pub fn from_env() -> Result<Self> {
        let vendor = env::var("SPHINXQL_DB_VENDOR").unwrap_or_else(|_| "postgresql".to_string());
        let vendor = DatabaseVendor::from_vendor_string(&vendor)?;
        let port = env::var("SPHINXQL_DB_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| vendor.default_port());
        Ok(Self {
            vendor,
            host: env::var("SPHINXQL_DB_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            user: env::var("SPHINXQL_DB_USER").unwrap_or_else(|_| "sphinx".to_string()),
            password: env::var("SPHINXQL_DB_PASSWORD").unwrap_or_default(),
            name: env::var("SPHINXQL_DB_NAME").unwrap_or_else(|_| "sphinx".to_string()),
        })
    }
}
