//! Infrastructure adapters for Entigen.
//!
//! This crate implements the ports defined in `entigen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin;
pub mod document;
pub mod filesystem;
pub mod renderer;
pub mod script_source;
pub mod template_store;

// Re-export commonly used adapters
pub use document::{DocumentFormat, load_document};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use renderer::HandlebarsRenderer;
pub use script_source::{FileScriptSource, InMemoryScriptSource};
pub use template_store::InMemoryStore;
