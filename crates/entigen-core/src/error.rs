//! Unified error handling for Entigen Core.
//!
//! This module provides a unified error type that wraps configuration and
//! application errors. Both are rendered transparently so nested failures
//! read as one chained, greppable line.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::ConfigError;

/// Root error type for Entigen Core operations.
#[derive(Debug, Error, Clone)]
pub enum EntigenError {
    /// Errors from the configuration model (schema, reference, deprecation).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors from the application layer (loading, generation, I/O).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl EntigenError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in Entigen".into(),
                "Please report this issue at: https://github.com/cosecruz/entigen/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => match e.category() {
                crate::domain::ErrorCategory::Schema => ErrorCategory::Schema,
                crate::domain::ErrorCategory::Reference => ErrorCategory::Reference,
                crate::domain::ErrorCategory::Deprecation => ErrorCategory::Deprecation,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// A `LoadError` for a document or script.
    pub fn load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ApplicationError::Load {
            source_name: source_name.into(),
            reason: reason.into(),
        }
        .into()
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Load,
    Schema,
    Reference,
    Deprecation,
    NotFound,
    Generation,
    Io,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type EntigenResult<T> = Result<T, EntigenError>;
