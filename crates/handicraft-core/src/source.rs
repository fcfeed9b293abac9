//! Backing sources of raw product records.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// The backing file or store could not produce records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read product records from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context} must contain a JSON array of product records")]
    NotAnArray { context: String },

    #[error("product store query failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Produces the full raw record set, in load order.
pub trait ProductSource: Send + Sync {
    fn fetch_records(&self) -> impl Future<Output = Result<Vec<Value>, SourceError>> + Send;

    /// Human-readable location for log lines.
    fn describe(&self) -> String;
}

/// Reads records from a JSON file holding a top-level array.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductSource for JsonFileSource {
    async fn fetch_records(&self) -> Result<Vec<Value>, SourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        parse_records(&raw, &self.path.display().to_string())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Parses a JSON document holding an array of records.
///
/// `context` names the document in error messages.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] for malformed JSON and
/// [`SourceError::NotAnArray`] when the top level is not an array.
pub fn parse_records(raw: &str, context: &str) -> Result<Vec<Value>, SourceError> {
    let parsed: Value = serde_json::from_str(raw).map_err(|source| SourceError::Parse {
        context: context.to_string(),
        source,
    })?;

    match parsed {
        Value::Array(records) => Ok(records),
        _ => Err(SourceError::NotAnArray {
            context: context.to_string(),
        }),
    }
}
