//! Binds a script entry to the nodes its generator selects and renders the
//! resulting artifacts.

use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        generators::{Generator, Selection},
        ports::{TemplateRenderer, TemplateStore},
    },
    domain::{GeneratorEntry, NodePath, RootConfig},
    error::{EntigenError, EntigenResult},
};

/// A rendered file, not yet reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Relative to the output root.
    pub path: PathBuf,
    pub content: String,
    /// Node the artifact was rendered for.
    pub node: NodePath,
}

/// Values every render model carries besides the node itself.
#[derive(Debug, Clone, Default)]
pub struct RenderInputs<'a> {
    pub runtime: Option<&'a BTreeMap<String, String>>,
    pub output: Option<&'a BTreeMap<String, String>>,
}

pub struct TemplateBinder<'a> {
    templates: &'a dyn TemplateStore,
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> TemplateBinder<'a> {
    pub fn new(templates: &'a dyn TemplateStore, renderer: &'a dyn TemplateRenderer) -> Self {
        Self {
            templates,
            renderer,
        }
    }

    /// Render one entry for every selected node.
    ///
    /// The entry is all-or-nothing: the first failure discards everything
    /// rendered so far.
    #[instrument(skip_all, fields(script = script_id, generator = %entry.generator))]
    pub fn bind(
        &self,
        script_id: &str,
        entry: &GeneratorEntry,
        generator: &dyn Generator,
        root: &RootConfig,
        inputs: &RenderInputs<'_>,
    ) -> EntigenResult<Vec<Artifact>> {
        let source = self.templates.get(&entry.template)?;
        let root_value = to_model(root, script_id, entry, &NodePath::root())?;

        generator
            .select(root)
            .into_iter()
            .map(|selection| -> EntigenResult<Artifact> {
                let node = selection.path();
                let fail = |reason: String| -> EntigenError {
                    ApplicationError::Generation {
                        script: script_id.to_string(),
                        generator: entry.generator.clone(),
                        node: node.to_string(),
                        reason,
                    }
                    .into()
                };

                let model = self.model(&root_value, &selection, inputs, script_id, entry)?;
                let render = |name: &str, text: &str| {
                    self.renderer
                        .render(name, text, &model)
                        .map_err(|e| fail(e.to_string()))
                };

                let file = render(&format!("{}#file", entry.template), &entry.file)?;
                let directory = match &entry.directory {
                    Some(d) => render(&format!("{}#directory", entry.template), d)?,
                    None => String::new(),
                };
                let path = artifact_path(&directory, &file).map_err(&fail)?;
                let content = render(&entry.template, &source)?;

                debug!(path = %path.display(), node = %node, "artifact rendered");
                Ok(Artifact {
                    path,
                    content,
                    node,
                })
            })
            .collect()
    }

    fn model(
        &self,
        root: &Value,
        selection: &Selection<'_>,
        inputs: &RenderInputs<'_>,
        script_id: &str,
        entry: &GeneratorEntry,
    ) -> EntigenResult<Value> {
        let entity = match selection.entity() {
            Some(e) => to_model(e, script_id, entry, e.path())?,
            None => Value::Null,
        };
        Ok(json!({
            "root": root,
            "entity": entity,
            "runtime": inputs.runtime,
            "output": inputs.output,
        }))
    }
}

fn to_model<T: serde::Serialize>(
    node: &T,
    script_id: &str,
    entry: &GeneratorEntry,
    path: &NodePath,
) -> EntigenResult<Value> {
    serde_json::to_value(node).map_err(|e| {
        ApplicationError::Generation {
            script: script_id.to_string(),
            generator: entry.generator.clone(),
            node: path.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Join a rendered directory and file name, refusing anything that would
/// land outside the output root.
fn artifact_path(directory: &str, file: &str) -> Result<PathBuf, String> {
    let file = file.trim();
    if file.is_empty() {
        return Err("rendered file name is empty".into());
    }
    let path = Path::new(directory.trim()).join(file);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(format!(
            "rendered path '{}' must be relative to the output root",
            path.display()
        ));
    }
    Ok(path)
}
