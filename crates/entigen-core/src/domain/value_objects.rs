//! Domain value objects: the enumerated option sets of the configuration.
//!
//! # Design
//!
//! These are pure `Copy` value types compared by value.
//! Configuration documents carry them as strings; preparation resolves each
//! string against [`ConfigOption::OPTIONS`] and reports the valid choices when
//! it does not match.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant
//! 2. Add the `OPTIONS` entry and the `as_str` arm
//! 3. Parsing and error messages derive from the table

use std::fmt;

use crate::domain::{config::NodePath, error::ConfigError};

/// An enumerated configuration value.
pub trait ConfigOption: Sized + Copy + 'static {
    /// Canonical spellings, in declaration order.
    const OPTIONS: &'static [&'static str];
    /// Variants, index-aligned with `OPTIONS`.
    const VARIANTS: &'static [Self];

    fn as_str(&self) -> &'static str {
        let idx = Self::VARIANTS
            .iter()
            .position(|v| v.same(self))
            .unwrap_or_default();
        Self::OPTIONS[idx]
    }

    fn same(&self, other: &Self) -> bool;

    /// Case-insensitive lookup of a canonical spelling.
    fn parse_option(s: &str) -> Option<Self> {
        Self::OPTIONS
            .iter()
            .position(|o| o.eq_ignore_ascii_case(s.trim()))
            .map(|idx| Self::VARIANTS[idx])
    }
}

/// Resolve an enumerated field in place.
///
/// An absent value takes `default`; a present value is normalised to its
/// canonical spelling; anything else is a schema error listing the options.
pub(crate) fn resolve_option<T: ConfigOption>(
    raw: &mut Option<String>,
    default: T,
    path: &NodePath,
    field: &'static str,
) -> Result<T, ConfigError> {
    let value = match raw.as_deref() {
        None => default,
        Some(s) => T::parse_option(s).ok_or_else(|| ConfigError::InvalidOption {
            path: path.clone(),
            field,
            value: s.to_string(),
            options: T::OPTIONS.to_vec(),
        })?,
    };
    *raw = Some(value.as_str().to_string());
    Ok(value)
}

macro_rules! config_option {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl ConfigOption for $name {
            const OPTIONS: &'static [&'static str] = &[$($text),+];
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];

            fn same(&self, other: &Self) -> bool {
                self == other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(ConfigOption::as_str(self))
            }
        }
    };
}

config_option! {
    /// Where an entity's data comes from. The first variant is the default.
    DataSource {
        Database => "Database",
        EntityFramework => "EntityFramework",
        HttpAgent => "HttpAgent",
        None => "None",
    }
}

config_option! {
    /// What an operation does.
    OperationKind {
        Custom => "Custom",
        Get => "Get",
        GetAll => "GetAll",
        Create => "Create",
        Update => "Update",
        Patch => "Patch",
        Delete => "Delete",
    }
}

config_option! {
    /// How a parameter travels through the generated layers.
    LayerPassing {
        All => "All",
        ToManagerSet => "ToManagerSet",
        ToManagerCollSet => "ToManagerCollSet",
    }
}

config_option! {
    /// Where a web API parameter is bound from.
    WebApiFrom {
        FromQuery => "FromQuery",
        FromBody => "FromBody",
        FromRoute => "FromRoute",
        FromEntityProperties => "FromEntityProperties",
    }
}

config_option! {
    /// How derived event actions are spelled.
    EventActionFormat {
        None => "None",
        PastTense => "PastTense",
    }
}

impl OperationKind {
    /// Kinds addressed by the entity key (`.../{id}`).
    pub const fn is_keyed(self) -> bool {
        matches!(self, Self::Get | Self::Update | Self::Patch | Self::Delete)
    }

    /// Kinds that change state and publish events by default.
    pub const fn is_mutating(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Patch | Self::Delete)
    }

    /// Kinds that receive the entity value as their body.
    pub const fn takes_value(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Patch)
    }

    pub const fn http_method(self) -> &'static str {
        match self {
            Self::Get | Self::GetAll => "GET",
            Self::Create | Self::Custom => "POST",
            Self::Update => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Verb used for the default event action; `None` for custom operations.
    pub const fn event_verb(self) -> Option<&'static str> {
        match self {
            Self::Create => Some("Create"),
            Self::Update | Self::Patch => Some("Update"),
            Self::Delete => Some("Delete"),
            _ => None,
        }
    }
}

/// Primitive property types recognised without an entity lookup.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "string", "int", "long", "decimal", "bool", "DateTime", "Guid", "ChangeLog",
];

/// Primitive types that can serve as an entity identifier.
pub const IDENTIFIER_TYPES: &[&str] = &["Guid", "int", "long", "string"];
