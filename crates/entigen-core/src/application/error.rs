//! Application layer errors.
//!
//! These errors represent failures in orchestration: loading documents and
//! scripts, resolving implementations, rendering and writing artifacts.
//! Configuration problems are `ConfigError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{EntigenError, ErrorCategory};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A document or script could not be loaded.
    #[error("{source_name}: {reason}")]
    Load { source_name: String, reason: String },

    /// A script (or one it inherits from) failed to load or validate.
    ///
    /// Nested failures chain: `Script 'X' is invalid: Script 'Y' is invalid: ...`.
    #[error("Script '{script}' is invalid: {source}")]
    ScriptInvalid {
        script: String,
        source: Box<EntigenError>,
    },

    /// A generator or editor name could not be resolved in the registry.
    #[error("{kind} '{name}' not found, searched scopes: {}", scopes.join(", "))]
    UnknownImplementation {
        kind: &'static str,
        name: String,
        scopes: Vec<String>,
    },

    /// A registered factory failed to construct its implementation.
    #[error("{kind} '{name}' could not be constructed: {reason}")]
    ConstructionFailed {
        kind: &'static str,
        name: String,
        reason: String,
    },

    /// A generator expects a different root configuration type.
    #[error(
        "Generator '{generator}' expects config type '{expected}' but the script declares '{actual}'"
    )]
    ConfigTypeMismatch {
        generator: String,
        expected: String,
        actual: String,
    },

    /// A template resource is not available in the store.
    #[error("Template '{name}' not found")]
    TemplateNotFound { name: String },

    /// A template or name pattern failed to render.
    #[error("Template '{template}' failed to render: {reason}")]
    Render { template: String, reason: String },

    /// Rendering a template against a node failed.
    #[error("Generation failed [script: {script}, generator: {generator}, node: {node}]: {reason}")]
    Generation {
        script: String,
        generator: String,
        node: String,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Load { source_name, .. } => vec![
                format!("Check that '{source_name}' exists and is readable"),
                "Supported formats: .json, .yaml, .yml, .toml".into(),
            ],
            Self::ScriptInvalid { source, .. } => source.suggestions(),
            Self::UnknownImplementation { kind, scopes, .. } => vec![
                format!("Register the {} or add its scope with --scope", kind.to_lowercase()),
                format!("Scopes searched: {}", scopes.join(", ")),
                "Try: entigen list generators".into(),
            ],
            Self::TemplateNotFound { name } => vec![
                format!("Add '{name}.hbs' to the templates directory"),
                "Try: entigen list templates".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::Generation { node, .. } => vec![
                format!("Check the template fields used for {node}"),
                "Run with -vv to see the render model".into(),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Load { .. } => ErrorCategory::Load,
            Self::ScriptInvalid { source, .. } => source.category(),
            Self::UnknownImplementation { .. } | Self::TemplateNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::ConstructionFailed { .. } | Self::ConfigTypeMismatch { .. } => {
                ErrorCategory::Configuration
            }
            Self::Render { .. } | Self::Generation { .. } => ErrorCategory::Generation,
            Self::FilesystemError { .. } => ErrorCategory::Io,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_script_failures_chain() {
        let inner: EntigenError = ApplicationError::Load {
            source_name: "Base".into(),
            reason: "not found".into(),
        }
        .into();
        let middle: EntigenError = ApplicationError::ScriptInvalid {
            script: "Base".into(),
            source: Box::new(inner),
        }
        .into();
        let outer = ApplicationError::ScriptInvalid {
            script: "Api".into(),
            source: Box::new(middle),
        };

        assert_eq!(
            outer.to_string(),
            "Script 'Api' is invalid: Script 'Base' is invalid: Base: not found"
        );
        assert_eq!(outer.category(), ErrorCategory::Load);
    }

    #[test]
    fn unknown_implementation_lists_scopes() {
        let err = ApplicationError::UnknownImplementation {
            kind: "Generator",
            name: "Repo".into(),
            scopes: vec!["entigen".into(), "acme".into()],
        };
        assert_eq!(
            err.to_string(),
            "Generator 'Repo' not found, searched scopes: entigen, acme"
        );
    }
}
