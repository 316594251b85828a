//! Script loading: inheritance flattening and entry validation.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{ScriptSource, TemplateStore},
        registry::Registry,
    },
    domain::script::{DEFAULT_CONFIG_TYPE, Script, ScriptDocument},
    error::{EntigenError, EntigenResult},
};

pub struct ScriptLoader<'a> {
    source: &'a dyn ScriptSource,
}

/// Walk state for one `load` call.
#[derive(Default)]
struct Walk {
    /// Scripts currently being expanded, outermost first.
    stack: Vec<String>,
    /// Scripts already merged; a diamond contributes its base once.
    merged: HashSet<String>,
}

impl<'a> ScriptLoader<'a> {
    pub fn new(source: &'a dyn ScriptSource) -> Self {
        Self { source }
    }

    /// Load `location` and everything it inherits.
    ///
    /// Any failure is reported as `Script '<location>' is invalid: ...`, with
    /// one nesting level per inheritance step.
    #[instrument(skip(self))]
    pub fn load(&self, location: &str) -> EntigenResult<Script> {
        self.load_nested(location, &mut Walk::default())
            .map_err(|e| invalid(location, e))
    }

    fn load_nested(&self, location: &str, walk: &mut Walk) -> EntigenResult<Script> {
        if walk.stack.iter().any(|s| s == location) {
            walk.stack.push(location.to_string());
            return Err(EntigenError::load(
                location,
                format!("inheritance cycle: {}", walk.stack.join(" -> ")),
            ));
        }
        walk.stack.push(location.to_string());

        let value = self.source.load(location)?;
        if matches!(value, Value::Null) {
            return Err(EntigenError::load(location, "script is empty"));
        }
        let document: ScriptDocument = serde_json::from_value(value)
            .map_err(|e| EntigenError::load(location, e.to_string()))?;

        let mut entries = Vec::new();
        let mut editor: Option<String> = None;
        let mut inherited_type: Option<String> = None;

        for parent in &document.inherits {
            let resolved = self.source.resolve_inherited(location, parent);
            if walk.merged.contains(&resolved) {
                debug!(script = %resolved, "already inherited");
                continue;
            }
            let base = self
                .load_nested(&resolved, walk)
                .map_err(|e| invalid(parent, e))?;
            entries.extend(base.entries);
            if let Some(e) = base.editor {
                if editor.is_some() {
                    return Err(EntigenError::load(location, "at most one editor may be declared"));
                }
                editor = Some(e);
            }
            match &inherited_type {
                Some(t) if *t != base.config_type => {
                    return Err(EntigenError::load(
                        location,
                        format!(
                            "inherited scripts disagree on config type ('{t}' and '{}')",
                            base.config_type
                        ),
                    ));
                }
                _ => inherited_type = Some(base.config_type),
            }
        }

        if document.editor.is_some() && editor.is_some() {
            return Err(EntigenError::load(
                location,
                "an editor is already declared by an inherited script",
            ));
        }
        editor = document.editor.or(editor);

        let config_type = match (document.config_type, inherited_type) {
            (Some(own), Some(base)) if own != base => {
                return Err(EntigenError::load(
                    location,
                    format!("config type '{own}' differs from inherited '{base}'"),
                ));
            }
            (Some(own), _) => own,
            (None, Some(base)) => base,
            (None, None) => DEFAULT_CONFIG_TYPE.to_string(),
        };

        entries.extend(document.generators);
        walk.stack.pop();
        walk.merged.insert(location.to_string());

        let script = Script {
            id: document.id.unwrap_or_else(|| script_stem(location)),
            config_type,
            editor,
            entries,
        };
        debug!(script = %script.id, entries = script.entries.len(), "script loaded");
        Ok(script)
    }
}

/// Check every entry of a loaded script against what is registered.
///
/// Implementations must exist and construct, agree on the config type, and
/// their templates must be in the store. The editor, if any, must resolve.
#[instrument(skip_all, fields(script = %script.id))]
pub fn validate_script(
    script: &Script,
    registry: &Registry,
    templates: &dyn TemplateStore,
    scopes: &[String],
) -> EntigenResult<()> {
    if !script.is_known_config_type() {
        return Err(EntigenError::load(
            &script.id,
            format!("'{}' is not a valid config type", script.config_type),
        ));
    }

    let check = || -> EntigenResult<()> {
        for entry in &script.entries {
            let generator = registry.generator(&entry.generator, scopes)?;
            if generator.config_type() != script.config_type {
                return Err(ApplicationError::ConfigTypeMismatch {
                    generator: entry.generator.clone(),
                    expected: generator.config_type().to_string(),
                    actual: script.config_type.clone(),
                }
                .into());
            }
            if !templates.contains(&entry.template) {
                return Err(ApplicationError::TemplateNotFound {
                    name: entry.template.clone(),
                }
                .into());
            }
        }
        if let Some(editor) = &script.editor {
            registry.editor(editor, scopes)?;
        }
        Ok(())
    };
    check().map_err(|e| invalid(&script.id, e))
}

fn invalid(script: &str, source: EntigenError) -> EntigenError {
    ApplicationError::ScriptInvalid {
        script: script.to_string(),
        source: Box::new(source),
    }
    .into()
}

/// `scripts/EntityLibrary.yaml` → `EntityLibrary`.
fn script_stem(location: &str) -> String {
    std::path::Path::new(location)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(location)
        .to_string()
}
