//! In-memory template store with built-in templates.

use std::{
    collections::BTreeMap,
    fs,
    path::Path,
    sync::{Arc, RwLock},
};

use entigen_core::{
    application::{ApplicationError, ports::TemplateStore},
    error::{EntigenError, EntigenResult},
};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::builtin;

/// Extension of template files discovered in a directory.
pub const TEMPLATE_EXTENSION: &str = "hbs";

/// Thread-safe in-memory template store, keyed by template name.
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a store with built-in templates loaded.
    pub fn with_builtin() -> EntigenResult<Self> {
        let store = Self::new();
        store.load_builtin()?;
        Ok(store)
    }

    /// Load built-in templates.
    pub fn load_builtin(&self) -> EntigenResult<()> {
        for (name, source) in builtin::TEMPLATES {
            self.insert(name, (*source).to_string())?;
        }
        Ok(())
    }

    /// Load every `*.hbs` file below `dir`.
    ///
    /// The template name is the path relative to `dir` without the
    /// extension, with `/` separators: `api/controller.hbs` → `api/controller`.
    /// Returns the number of templates loaded.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load_directory(&self, dir: &Path) -> EntigenResult<usize> {
        if !dir.is_dir() {
            return Err(EntigenError::load(
                dir.display().to_string(),
                "templates directory not found",
            ));
        }

        let mut count = 0;
        for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                EntigenError::load(dir.display().to_string(), format!("directory walk error: {e}"))
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }

            let name = template_name(dir, path)?;
            let source = fs::read_to_string(path).map_err(|e| {
                EntigenError::load(path.display().to_string(), format!("failed to read: {e}"))
            })?;
            debug!(template = %name, "loaded template");
            self.insert(&name, source)?;
            count += 1;
        }
        Ok(count)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn template_name(dir: &Path, path: &Path) -> EntigenResult<String> {
    let relative = path.strip_prefix(dir).map_err(|_| {
        EntigenError::load(path.display().to_string(), "template is outside its directory")
    })?;
    let stem = relative.with_extension("");
    Ok(stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

impl TemplateStore for InMemoryStore {
    fn get(&self, name: &str) -> EntigenResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(name).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .map(|inner| inner.contains_key(name))
            .unwrap_or(false)
    }

    fn list(&self) -> EntigenResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.keys().cloned().collect())
    }

    fn insert(&self, name: &str, source: String) -> EntigenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert(name.to_string(), source);
        Ok(())
    }
}
