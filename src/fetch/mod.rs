// src/fetch/mod.rs

pub mod client;
pub mod html;
pub mod urls;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::process::RawTable;

pub use client::HttpFetcher;
pub use html::{parse_first_table, TableError};

/// Why a single page produced no table. None of these stop a batch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("non-success status {0}")]
    Status(StatusCode),

    #[error("no table found")]
    NoTable,

    #[error("unparseable table: {0}")]
    Table(#[from] TableError),

    #[error("bad URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Turns one page URL into its first table.
pub trait TableFetcher {
    fn fetch_table(&self, url: &Url) -> Result<RawTable, FetchError>;
}
