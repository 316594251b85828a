//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `entigen-adapters` crate provides implementations.

use std::path::Path;

use crate::error::EntigenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `entigen_adapters::filesystem::LocalFilesystem` (production)
/// - `entigen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - `create_dir_all` must be idempotent; two artifacts may share a new
///   parent directory
/// - `read_file` distinguishes "absent" (`Ok(None)`) from "unreadable" (`Err`)
/// - `read_file` returns raw bytes; existing files need not be UTF-8
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> EntigenResult<()>;

    /// Write content to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()>;

    /// Read a file's bytes, `None` if it does not exist.
    fn read_file(&self, path: &Path) -> EntigenResult<Option<Vec<u8>>>;
}

/// Port for template storage and retrieval.
///
/// Implemented by:
/// - `entigen_adapters::template_store::InMemoryStore` (built-in and loaded templates)
pub trait TemplateStore: Send + Sync {
    /// Get a template's source by name.
    fn get(&self, name: &str) -> EntigenResult<String>;

    /// Whether a template with this name is available.
    fn contains(&self, name: &str) -> bool;

    /// List all available template names, sorted.
    fn list(&self) -> EntigenResult<Vec<String>>;

    /// Insert or replace a template.
    fn insert(&self, name: &str, source: String) -> EntigenResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `entigen_adapters::renderer::HandlebarsRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render `source` against a JSON model.
    ///
    /// `name` identifies the template in error messages.
    fn render(&self, name: &str, source: &str, model: &serde_json::Value) -> EntigenResult<String>;
}

/// Port for locating generation scripts.
///
/// Implemented by:
/// - `entigen_adapters::script_source::FileScriptSource` (directories + built-ins)
/// - `entigen_adapters::script_source::InMemoryScriptSource` (testing)
pub trait ScriptSource: Send + Sync {
    /// Load and parse the script at `location` (an id or a path).
    ///
    /// Missing, empty or unparseable scripts are load errors.
    fn load(&self, location: &str) -> EntigenResult<serde_json::Value>;

    /// Ids of the scripts this source can resolve without a path.
    fn list(&self) -> Vec<String>;

    /// Location to load for `inherited`, named by the script at `parent`.
    ///
    /// Sources backed by files resolve relative names against the parent
    /// script's directory first. The default keeps `inherited` as is.
    fn resolve_inherited(&self, parent: &str, inherited: &str) -> String {
        let _ = parent;
        inherited.to_string()
    }
}
