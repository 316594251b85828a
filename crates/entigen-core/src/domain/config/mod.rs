//! The configuration tree.
//!
//! ```text
//! RootConfig
//! └── EntityConfig*
//!     ├── PropertyConfig*
//!     ├── OperationConfig*
//!     │   └── ParameterConfig*
//!     └── ConstConfig*
//! ```
//!
//! Children are owned `Vec`s. The up-link of every node is its [`NodePath`],
//! assigned once by the loader; parent and root *state* is never stored in a
//! child but handed to it as an immutable borrow while it is prepared.
//!
//! Preparation runs as two traversals (see [`PreparedConfig::prepare`]):
//!
//! 1. **Phase one**, top-down: a node resolves its own fields, then its
//!    children. A child receives `&Parent` and `&RootConfig` whose own child
//!    collections have been moved out, so it cannot observe a sibling.
//! 2. **Phase two**, per entity: operations resolve symbolic references to
//!    sibling operations, which by then have all completed phase one. Derived
//!    operation views are cached last.

mod coalesce;
mod constant;
mod deprecation;
mod entity;
mod operation;
mod parameter;
mod path;
mod property;
mod root;

use std::collections::BTreeMap;

use tracing::{debug, instrument};

pub use coalesce::DefaultWhereAbsent;
pub(crate) use coalesce::{required, required_str};
pub use constant::ConstConfig;
pub use deprecation::{Diagnostics, Warning};
pub(crate) use deprecation::check_deprecations;
pub use entity::EntityConfig;
pub use operation::{EventConfig, OperationConfig, VALUE_PARAMETER};
pub use parameter::ParameterConfig;
pub use path::{NodeKind, NodePath};
pub(crate) use path::segment_name;
pub use property::PropertyConfig;
pub use root::{APP_NAME_PARAMETER, COMPANY_PARAMETER, RootConfig};

use crate::domain::error::ConfigError;

/// Keys a document carries that the node does not recognise.
///
/// Used for deprecation checks and as an extension point: templates and
/// editors can read (and editors can add) arbitrary values here.
pub type ExtraProperties = BTreeMap<String, serde_json::Value>;

/// Caller supplied `key → value` pairs (organisation name, app name, ...).
pub type RuntimeParameters = BTreeMap<String, String>;

/// A configuration tree that has been through both preparation phases.
///
/// The only way to obtain one is [`PreparedConfig::prepare`], so holding a
/// `PreparedConfig` means every node was prepared exactly once and all
/// derived views are populated.
#[derive(Debug, Clone)]
pub struct PreparedConfig {
    root: RootConfig,
    diagnostics: Diagnostics,
}

impl PreparedConfig {
    /// Resolve every optional field of the tree.
    ///
    /// Runs phase one over the whole tree, then phase two, then caches the
    /// derived views. Non-fatal deprecations are collected as warnings.
    #[instrument(skip_all)]
    pub fn prepare(mut root: RootConfig) -> Result<Self, ConfigError> {
        let mut diagnostics = Diagnostics::new();
        root.prepare(&mut diagnostics)?;

        let mut entities = std::mem::take(&mut root.entities);

        // Phase one: each entity sees the prepared root, never a sibling entity.
        for entity in &mut entities {
            entity.prepare(&root, &mut diagnostics)?;
        }

        // Phase two: cross-sibling references inside each entity.
        for entity in &mut entities {
            entity.resolve()?;
        }

        debug!(
            entities = entities.len(),
            warnings = diagnostics.warnings().len(),
            "configuration prepared"
        );
        root.entities = entities;
        Ok(Self { root, diagnostics })
    }

    pub fn root(&self) -> &RootConfig {
        &self.root
    }

    /// Write access for editors, which run after preparation.
    pub fn root_mut(&mut self) -> &mut RootConfig {
        &mut self.root
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_root(self) -> RootConfig {
        self.root
    }
}
