// ============================================================================
// domain/error.rs - CONFIGURATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

use crate::domain::config::NodePath;

/// Root domain error type.
///
/// Raised while preparing or validating a configuration tree. Every variant
/// carries the qualified path of the node it was raised for, so the rendered
/// message is stable and greppable from CI logs.
///
/// All errors are:
/// - Cloneable (they are collected and re-reported)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    // ========================================================================
    // Schema Errors
    // ========================================================================
    #[error("{path}: required field '{field}' is missing")]
    MissingField { path: NodePath, field: &'static str },

    #[error(
        "{path}: '{value}' is not a valid value for '{field}'; valid options are: {}",
        options.join(", ")
    )]
    InvalidOption {
        path: NodePath,
        field: &'static str,
        value: String,
        options: Vec<&'static str>,
    },

    #[error("{path}: {message}")]
    Schema { path: NodePath, message: String },

    #[error("{path}: {kind} name '{name}' is not unique")]
    Duplicate {
        path: NodePath,
        kind: &'static str,
        name: String,
    },

    #[error("{path}: operation type '{kind}' requires the entity to have {capability}")]
    MissingCapability {
        path: NodePath,
        kind: String,
        capability: &'static str,
    },

    // ========================================================================
    // Reference Errors
    // ========================================================================
    #[error("{path}: {kind} '{name}' does not exist")]
    Reference {
        path: NodePath,
        kind: &'static str,
        name: String,
    },

    // ========================================================================
    // Deprecations
    // ========================================================================
    #[error("{path}: '{field}' is no longer supported; {advice}")]
    Deprecated {
        path: NodePath,
        field: String,
        advice: String,
    },
}

impl ConfigError {
    /// The qualified path of the offending node.
    pub fn path(&self) -> &NodePath {
        match self {
            Self::MissingField { path, .. }
            | Self::InvalidOption { path, .. }
            | Self::Schema { path, .. }
            | Self::Duplicate { path, .. }
            | Self::MissingCapability { path, .. }
            | Self::Reference { path, .. }
            | Self::Deprecated { path, .. } => path,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingField { path, field } => vec![
                format!("Add '{field}' to {path}"),
                "Some root fields can also be supplied as runtime parameters (-p Key=Value)".into(),
            ],
            Self::InvalidOption { field, options, .. } => vec![
                format!("Use one of the following for '{field}':"),
                format!("  {}", options.join(" | ")),
            ],
            Self::Reference { kind, name, .. } => vec![
                format!("Check the spelling of {kind} '{name}'"),
                "Names are case-sensitive".into(),
            ],
            Self::Duplicate { kind, name, .. } => {
                vec![format!("Rename or remove one of the {kind}s named '{name}'")]
            }
            Self::MissingCapability { capability, .. } => vec![
                format!("Declare {capability}"),
                "Or list the operation parameters explicitly".into(),
            ],
            Self::Deprecated { advice, .. } => vec![advice.clone()],
            Self::Schema { .. } => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Reference { .. } => ErrorCategory::Reference,
            Self::Deprecated { .. } => ErrorCategory::Deprecation,
            _ => ErrorCategory::Schema,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Schema,
    Reference,
    Deprecation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::NodeKind;

    #[test]
    fn messages_carry_the_qualified_path() {
        let path = NodePath::root()
            .child(NodeKind::Entity, "Person")
            .child(NodeKind::Operation, "Get");
        let err = ConfigError::Reference {
            path,
            kind: "operation",
            name: "DoesNotExist".into(),
        };

        assert_eq!(
            err.to_string(),
            "Entity(Person).Operation(Get): operation 'DoesNotExist' does not exist"
        );
        assert_eq!(err.category(), ErrorCategory::Reference);
    }

    #[test]
    fn invalid_option_lists_choices() {
        let err = ConfigError::InvalidOption {
            path: NodePath::root(),
            field: "dataSource",
            value: "Mongo".into(),
            options: vec!["Database", "None"],
        };
        assert!(err.to_string().contains("valid options are: Database, None"));
    }
}
