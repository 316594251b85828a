//! Application layer for Entigen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (`GenerationService`)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Engine parts**: loader, script loader, registry, binder, reconciler
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Configuration rules
//! (defaults, inference, validation) live in `crate::domain`.

pub mod binder;
pub mod error;
pub mod generators;
pub mod loader;
pub mod ports;
pub mod reconciler;
pub mod registry;
pub mod request;
pub mod script_loader;
pub mod services;
pub mod statistics;

pub use binder::{Artifact, TemplateBinder};
pub use error::ApplicationError;
pub use generators::{ConfigEditor, Generator, Selection};
pub use loader::ConfigLoader;
pub use ports::{Filesystem, ScriptSource, TemplateRenderer, TemplateStore};
pub use reconciler::Reconciler;
pub use registry::{DEFAULT_SCOPE, Registry, editor_factory, generator_factory};
pub use request::GenerationRequest;
pub use script_loader::ScriptLoader;
pub use services::{GenerationService, RunState};
pub use statistics::{ArtifactOutcome, ArtifactStatus, GenerationStatistics};
