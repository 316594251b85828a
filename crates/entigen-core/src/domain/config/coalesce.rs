//! The "explicit → inherited → computed" defaulting helper.

use crate::domain::{config::NodePath, error::ConfigError};

/// Lazily fill an optional field.
///
/// Chain calls from most to least specific source:
///
/// ```rust
/// use entigen_core::domain::config::DefaultWhereAbsent;
///
/// let inherited: Option<String> = None;
/// let mut text: Option<String> = None;
/// text.default_where_absent(|| inherited.clone())
///     .default_where_absent(|| Some("Person".to_string()));
/// assert_eq!(text.as_deref(), Some("Person"));
/// ```
///
/// A fallback closure never runs once the slot holds a value, so fallbacks
/// may have side effects such as emitting a warning.
pub trait DefaultWhereAbsent<T> {
    fn default_where_absent(&mut self, fallback: impl FnOnce() -> Option<T>) -> &mut Self;
}

impl<T> DefaultWhereAbsent<T> for Option<T> {
    fn default_where_absent(&mut self, fallback: impl FnOnce() -> Option<T>) -> &mut Self {
        if self.is_none() {
            *self = fallback();
        }
        self
    }
}

/// Read a mandatory field.
pub(crate) fn required<'a, T>(
    value: &'a Option<T>,
    path: &NodePath,
    field: &'static str,
) -> Result<&'a T, ConfigError> {
    value.as_ref().ok_or_else(|| ConfigError::MissingField {
        path: path.clone(),
        field,
    })
}

/// Read a mandatory string field, treating blank as missing.
pub(crate) fn required_str<'a>(
    value: &'a Option<String>,
    path: &NodePath,
    field: &'static str,
) -> Result<&'a str, ConfigError> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField {
            path: path.clone(),
            field,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn explicit_value_wins_and_fallback_is_not_evaluated() {
        let calls = Cell::new(0);
        let mut value = Some(1);
        value.default_where_absent(|| {
            calls.set(calls.get() + 1);
            Some(2)
        });

        assert_eq!(value, Some(1));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn first_present_fallback_wins() {
        let calls = Cell::new(0);
        let mut value: Option<i32> = None;
        value
            .default_where_absent(|| None)
            .default_where_absent(|| Some(7))
            .default_where_absent(|| {
                calls.set(calls.get() + 1);
                Some(9)
            });

        assert_eq!(value, Some(7));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn blank_mandatory_string_is_missing() {
        let err = required_str(&Some("  ".into()), &NodePath::root(), "name").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "name", .. }));
        assert!(required(&Some(3), &NodePath::root(), "x").is_ok());
    }
}
