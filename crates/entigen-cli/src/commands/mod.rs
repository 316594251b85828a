//! Subcommand handlers.

use std::path::{Path, PathBuf};

use entigen_adapters::{FileScriptSource, HandlebarsRenderer, InMemoryStore, LocalFilesystem};
use entigen_core::application::{GenerationService, Registry};
use tracing::debug;

use crate::{config::AppConfig, error::CliResult};

pub mod completions;
pub mod generate;
pub mod list;

/// Wire the real adapters into a [`GenerationService`].
///
/// Templates from `templates` shadow built-ins of the same name. Scripts are
/// looked up in `script_dirs` first, then the settings' scripts directory.
pub(crate) fn build_service(
    config: &AppConfig,
    templates: Option<&Path>,
    script_dirs: &[PathBuf],
) -> CliResult<GenerationService> {
    let store = InMemoryStore::with_builtin()?;
    if let Some(dir) = config.templates_directory(templates) {
        let loaded = store.load_directory(dir)?;
        debug!(dir = %dir.display(), loaded, "templates loaded");
    }

    let mut scripts = FileScriptSource::new();
    for dir in script_dirs
        .iter()
        .chain(config.templates.scripts_directory.as_ref())
    {
        scripts = scripts.with_directory(dir);
    }

    Ok(GenerationService::new(
        Box::new(scripts),
        Box::new(store),
        Box::new(HandlebarsRenderer::new()),
        Box::new(LocalFilesystem::new()),
        Registry::with_builtins(),
    ))
}
