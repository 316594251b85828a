//! Generation Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Load and validate the script
//! 2. Load, prepare and validate the configuration
//! 3. Run the script's editor, if any
//! 4. Render every entry, then reconcile the artifacts with the output root
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::{collections::HashSet, fmt, time::Instant};

use serde_json::Value;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        binder::{Artifact, RenderInputs, TemplateBinder},
        loader::ConfigLoader,
        ports::{Filesystem, ScriptSource, TemplateRenderer, TemplateStore},
        reconciler::Reconciler,
        registry::{Registry, effective_scopes},
        request::GenerationRequest,
        script_loader::{ScriptLoader, validate_script},
        statistics::GenerationStatistics,
    },
    domain::{ConfigValidator, PreparedConfig, Script},
    error::EntigenResult,
};

/// Stages of one generation run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Loaded,
    Prepared,
    Validated,
    Generating,
    Reconciling,
    Completed,
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Main generation service.
pub struct GenerationService {
    scripts: Box<dyn ScriptSource>,
    templates: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    registry: Registry,
}

impl GenerationService {
    /// Create a new generation service with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use entigen_core::application::{GenerationService, Registry};
    ///
    /// let service = GenerationService::new(
    ///     scripts,    // impl ScriptSource
    ///     templates,  // impl TemplateStore
    ///     renderer,   // impl TemplateRenderer
    ///     filesystem, // impl Filesystem
    ///     Registry::with_builtins(),
    /// );
    /// ```
    pub fn new(
        scripts: Box<dyn ScriptSource>,
        templates: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        registry: Registry,
    ) -> Self {
        Self {
            scripts,
            templates,
            renderer,
            filesystem,
            registry,
        }
    }

    /// Run a generation.
    ///
    /// Nothing is written unless loading, preparation, validation and every
    /// entry's rendering succeed.
    #[instrument(
        skip_all,
        fields(
            run_id = %Uuid::new_v4(),
            script = %request.script,
            output = %request.output_root.display(),
            simulate = request.simulate
        )
    )]
    pub fn generate(
        &self,
        request: &GenerationRequest,
        document: &Value,
    ) -> EntigenResult<GenerationStatistics> {
        let started = Instant::now();
        match self.run(request, document) {
            Ok(mut statistics) => {
                statistics.elapsed = started.elapsed();
                info!(
                    state = %RunState::Completed,
                    created = statistics.created,
                    updated = statistics.updated,
                    unchanged = statistics.not_changed,
                    lines = statistics.total_lines,
                    "generation completed"
                );
                Ok(statistics)
            }
            Err(e) => {
                error!(state = %RunState::Aborted, error = %e, "generation aborted");
                Err(e)
            }
        }
    }

    /// Load a script with its inheritance chain and check it against the
    /// registry and template store.
    pub fn load_script(&self, location: &str, scopes: &[String]) -> EntigenResult<Script> {
        let scopes = effective_scopes(scopes);
        let script = ScriptLoader::new(self.scripts.as_ref()).load(location)?;
        validate_script(&script, &self.registry, self.templates.as_ref(), &scopes)?;
        Ok(script)
    }

    pub fn list_generators(&self) -> Vec<String> {
        self.registry.generator_names()
    }

    pub fn list_editors(&self) -> Vec<String> {
        self.registry.editor_names()
    }

    pub fn list_templates(&self) -> EntigenResult<Vec<String>> {
        self.templates.list()
    }

    pub fn list_scripts(&self) -> Vec<String> {
        self.scripts.list()
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn run(
        &self,
        request: &GenerationRequest,
        document: &Value,
    ) -> EntigenResult<GenerationStatistics> {
        let scopes = effective_scopes(&request.search_scopes);
        let script = self.load_script(&request.script, &scopes)?;

        let root = ConfigLoader::load(
            &request.config_source,
            document.clone(),
            &script.config_type,
            &request.runtime_parameters,
        )?;
        info!(state = %RunState::Loaded, entries = script.entries.len());

        let mut prepared = PreparedConfig::prepare(root)?;
        info!(state = %RunState::Prepared, warnings = prepared.diagnostics().warnings().len());

        ConfigValidator::validate(&prepared)?;
        info!(state = %RunState::Validated);

        if let Some(name) = &script.editor {
            self.registry
                .editor(name, &scopes)?
                .edit(prepared.root_mut())?;
            info!(editor = %name, "editor applied");
        }

        let mut statistics = GenerationStatistics {
            warnings: prepared
                .diagnostics()
                .warnings()
                .iter()
                .map(ToString::to_string)
                .collect(),
            ..Default::default()
        };

        let batches = self.render_all(&script, &prepared, request, &scopes)?;

        info!(
            state = %RunState::Reconciling,
            artifacts = batches.iter().map(Vec::len).sum::<usize>()
        );
        let reconciler = Reconciler::new(self.filesystem.as_ref(), request.simulate);
        for artifacts in &batches {
            reconciler.reconcile(&request.output_root, artifacts, &mut statistics)?;
        }

        Ok(statistics)
    }

    /// Render every entry before anything is written; one batch per entry.
    fn render_all(
        &self,
        script: &Script,
        prepared: &PreparedConfig,
        request: &GenerationRequest,
        scopes: &[String],
    ) -> EntigenResult<Vec<Vec<Artifact>>> {
        let binder = TemplateBinder::new(self.templates.as_ref(), self.renderer.as_ref());
        let inputs = RenderInputs {
            runtime: Some(&request.runtime_parameters),
            output: Some(&request.output_parameters),
        };

        let mut seen = HashSet::new();
        let mut batches = Vec::with_capacity(script.entries.len());
        for entry in &script.entries {
            info!(
                state = %RunState::Generating,
                generator = %entry.generator,
                template = %entry.template
            );
            let generator = self.registry.generator(&entry.generator, scopes)?;
            let artifacts =
                binder.bind(&script.id, entry, generator.as_ref(), prepared.root(), &inputs)?;

            for artifact in &artifacts {
                if !seen.insert(artifact.path.clone()) {
                    return Err(ApplicationError::Generation {
                        script: script.id.clone(),
                        generator: entry.generator.clone(),
                        node: artifact.node.to_string(),
                        reason: format!(
                            "'{}' is rendered more than once in this run",
                            artifact.path.display()
                        ),
                    }
                    .into());
                }
            }
            batches.push(artifacts);
        }
        Ok(batches)
    }
}
