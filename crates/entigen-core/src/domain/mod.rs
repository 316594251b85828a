//! Core domain layer for Entigen.
//!
//! Pure configuration logic: the node tree, its two-phase preparation,
//! naming conventions and structural validation. No I/O happens here;
//! documents arrive already parsed and scripts arrive already loaded.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: No filesystem, network, or external calls
//! - **Synchronous**: Preparation order is part of correctness
//! - **Path-qualified errors**: Every `ConfigError` names the node it concerns

pub mod config;
pub mod error;
pub mod naming;
pub mod script;
pub mod value_objects;

mod validation;

pub use config::{
    APP_NAME_PARAMETER, COMPANY_PARAMETER, ConstConfig, DefaultWhereAbsent, Diagnostics,
    EntityConfig, EventConfig, NodeKind, NodePath, OperationConfig, ParameterConfig,
    PreparedConfig, PropertyConfig, RootConfig, RuntimeParameters, Warning,
};
pub use error::{ConfigError, ErrorCategory};
pub use script::{GeneratorEntry, Script, ScriptDocument};
pub use validation::ConfigValidator;
pub use value_objects::{
    ConfigOption, DataSource, EventActionFormat, LayerPassing, OperationKind, WebApiFrom,
};
