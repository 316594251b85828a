//! Deprecated configuration keys and the non-fatal diagnostics sink.

use std::fmt;

use tracing::warn;

use super::{ExtraProperties, NodeKind, NodePath};
use crate::domain::error::ConfigError;

struct Deprecation {
    kind: NodeKind,
    key: &'static str,
    fatal: bool,
    advice: &'static str,
}

/// Keys that used to mean something. Fatal entries changed meaning and must
/// be migrated; the others are ignored with a warning.
const DEPRECATIONS: &[Deprecation] = &[
    Deprecation {
        kind: NodeKind::Root,
        key: "refDataNamespace",
        fatal: false,
        advice: "it is ignored and can be removed",
    },
    Deprecation {
        kind: NodeKind::Entity,
        key: "autoImplement",
        fatal: true,
        advice: "use 'dataSource' instead",
    },
    Deprecation {
        kind: NodeKind::Entity,
        key: "webApiAuthorize",
        fatal: false,
        advice: "it is ignored and can be removed",
    },
    Deprecation {
        kind: NodeKind::Operation,
        key: "eventSubjectFormat",
        fatal: true,
        advice: "use 'eventSubject' instead",
    },
    Deprecation {
        kind: NodeKind::Operation,
        key: "webApiStatus",
        fatal: false,
        advice: "it is ignored and can be removed",
    },
];

/// A non-fatal finding reported alongside a successful preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub path: NodePath,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Collects warnings raised while preparing a tree.
///
/// Every warning is also emitted as a `tracing` event when recorded.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, path: &NodePath, message: impl Into<String>) {
        let warning = Warning {
            path: path.clone(),
            message: message.into(),
        };
        warn!(node = %warning.path, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Check a node's unrecognised keys against the deprecation table.
///
/// Deprecated keys are removed from the bag; fatal ones abort preparation.
pub(crate) fn check_deprecations(
    kind: NodeKind,
    path: &NodePath,
    extra: &mut ExtraProperties,
    diagnostics: &mut Diagnostics,
) -> Result<(), ConfigError> {
    for dep in DEPRECATIONS.iter().filter(|d| d.kind == kind) {
        if extra.remove(dep.key).is_none() {
            continue;
        }
        if dep.fatal {
            return Err(ConfigError::Deprecated {
                path: path.clone(),
                field: dep.key.to_string(),
                advice: dep.advice.to_string(),
            });
        }
        diagnostics.warn(
            path,
            format!("'{}' is deprecated; {}", dep.key, dep.advice),
        );
    }
    Ok(())
}
