//! Script sources: where generation scripts come from.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use entigen_core::{
    application::{ApplicationError, ports::ScriptSource},
    error::{EntigenError, EntigenResult},
};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    builtin,
    document::{self, DocumentFormat},
};

/// Extensions tried, in order, when a script is requested by id.
const SCRIPT_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

/// Resolves scripts from disk, falling back to the built-in scripts.
///
/// A location is tried as
/// 1. a path, if it names an existing file;
/// 2. `<dir>/<location>.<ext>` for each search directory, in order;
/// 3. a built-in script id.
#[derive(Debug, Clone, Default)]
pub struct FileScriptSource {
    directories: Vec<PathBuf>,
    builtin: bool,
}

impl FileScriptSource {
    /// A source that knows only the built-in scripts.
    pub fn new() -> Self {
        Self {
            directories: Vec::new(),
            builtin: true,
        }
    }

    /// Search `dir` for scripts named by id.
    pub fn with_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directories.push(dir.into());
        self
    }

    pub fn without_builtin(mut self) -> Self {
        self.builtin = false;
        self
    }

    fn find_file(&self, location: &str) -> Option<PathBuf> {
        let direct = Path::new(location);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        self.directories.iter().find_map(|dir| {
            SCRIPT_EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{location}.{ext}")))
                .find(|candidate| candidate.is_file())
        })
    }
}

impl ScriptSource for FileScriptSource {
    #[instrument(skip(self))]
    fn load(&self, location: &str) -> EntigenResult<Value> {
        if let Some(path) = self.find_file(location) {
            debug!(path = %path.display(), "script found on disk");
            return document::load_document(&path);
        }
        if self.builtin {
            if let Some(source) = builtin::script(location) {
                debug!("built-in script");
                return document::parse(source, DocumentFormat::Yaml)
                    .map_err(|e| EntigenError::load(location, e.to_string()));
            }
        }
        Err(EntigenError::load(location, "script not found"))
    }

    fn list(&self) -> Vec<String> {
        let mut ids = BTreeSet::new();
        if self.builtin {
            ids.extend(builtin::SCRIPTS.iter().map(|(id, _)| id.to_string()));
        }
        for dir in &self.directories {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for path in entries.flatten().map(|e| e.path()) {
                let is_script = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| SCRIPT_EXTENSIONS.contains(&e));
                if let (true, Some(stem)) = (is_script, path.file_stem()) {
                    ids.insert(stem.to_string_lossy().into_owned());
                }
            }
        }
        ids.into_iter().collect()
    }

    fn resolve_inherited(&self, parent: &str, inherited: &str) -> String {
        if Path::new(inherited).is_absolute() {
            return inherited.to_string();
        }
        let Some(dir) = self
            .find_file(parent)
            .and_then(|path| path.parent().map(Path::to_path_buf))
        else {
            return inherited.to_string();
        };

        std::iter::once(dir.join(inherited))
            .chain(
                SCRIPT_EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(format!("{inherited}.{ext}"))),
            )
            .find(|candidate| candidate.is_file())
            .map(|found| found.display().to_string())
            .unwrap_or_else(|| inherited.to_string())
    }
}

/// Scripts held in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScriptSource {
    scripts: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl InMemoryScriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, script: Value) -> EntigenResult<()> {
        self.scripts
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?
            .insert(id.into(), script);
        Ok(())
    }

    pub fn with_script(self, id: impl Into<String>, script: Value) -> EntigenResult<Self> {
        self.insert(id, script)?;
        Ok(self)
    }
}

impl ScriptSource for InMemoryScriptSource {
    fn load(&self, location: &str) -> EntigenResult<Value> {
        let scripts = self
            .scripts
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        scripts
            .get(location)
            .cloned()
            .ok_or_else(|| EntigenError::load(location, "script not found"))
    }

    fn list(&self) -> Vec<String> {
        self.scripts
            .read()
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }
}
