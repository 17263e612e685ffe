// Copyright 2025 StrongDM Inc
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SphinxError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("unsupported database vendor: {0}")]
    UnsupportedVendor(String),
    #[error("schema error: {0}")]
    Schema(String),
    #[error("driver error: {0}")]
    Driver(String),
}

pub type Result<T> = std::result::Result<T, SphinxError>;
