//! Document parsing: JSON, YAML and TOML into a generic `serde_json::Value`.
//!
//! The format is chosen by file extension. Every failure surfaces as a
//! `LoadError` naming the document.

use std::{fs, io, path::Path};

use entigen_core::error::{EntigenError, EntigenResult};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Format for a path, by extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(DocumentError::UnsupportedContentType(ext)),
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported content type '.{0}'; expected .json, .yaml, .yml or .toml")]
    UnsupportedContentType(String),

    #[error("document is empty")]
    Empty,

    #[error("not found")]
    NotFound,

    #[error("failed to read: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Parse `content` in the given format.
pub fn parse(content: &str, format: DocumentFormat) -> Result<Value, DocumentError> {
    if content.trim().is_empty() {
        return Err(DocumentError::Empty);
    }
    let value = match format {
        DocumentFormat::Json => serde_json::from_str(content)?,
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
        DocumentFormat::Toml => toml::from_str(content)?,
    };
    Ok(value)
}

/// Read and parse a document from disk.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_document(path: &Path) -> EntigenResult<Value> {
    read_document(path).map_err(|e| EntigenError::load(path.display().to_string(), e.to_string()))
}

fn read_document(path: &Path) -> Result<Value, DocumentError> {
    let format = DocumentFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DocumentError::NotFound,
        _ => DocumentError::Io(e),
    })?;
    let value = parse(&content, format)?;
    debug!(?format, "document parsed");
    Ok(value)
}
