// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeyError>;

/// Everything that can abort a measure (or, with fail-fast, the whole run).
/// Unmatched IPIP lookups are not errors; see `xref::CrossRef::unmatched`.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("{measure}: bad config: {msg}")]
    Config { measure: String, msg: String },

    #[error("{measure}: pattern `{field}` does not compile: {source}")]
    Pattern {
        measure: String,
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("{measure}: `{field}` has no capture for {text:?}")]
    MissingCapture {
        measure: String,
        field: &'static str,
        text: String,
    },

    #[error("{measure}: sign marker {value:?} is neither '+' nor '-'")]
    InvalidSign { measure: String, value: String },

    #[error("{measure}: item {text:?} appears before any scale title")]
    ScanOrder { measure: String, text: String },

    #[error("{}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GET {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl KeyError {
    pub fn config(measure: &str, msg: impl Into<String>) -> Self {
        KeyError::Config { measure: s!(measure), msg: msg.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KeyError::Io { path: path.into(), source }
    }
}
