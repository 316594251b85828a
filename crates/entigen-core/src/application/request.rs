use std::path::PathBuf;

use crate::domain::RuntimeParameters;

/// Everything a generation run needs besides the configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Script id or location, resolved by the `ScriptSource`.
    pub script: String,
    /// Name of the configuration document, used in load errors.
    pub config_source: String,
    /// Scopes searched, in order, when resolving generator and editor names.
    pub search_scopes: Vec<String>,
    pub runtime_parameters: RuntimeParameters,
    /// Exposed to templates as `output`.
    pub output_parameters: RuntimeParameters,
    pub output_root: PathBuf,
    pub simulate: bool,
}

impl GenerationRequest {
    pub fn new(script: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            config_source: "config".into(),
            search_scopes: Vec::new(),
            runtime_parameters: RuntimeParameters::new(),
            output_parameters: RuntimeParameters::new(),
            output_root: output_root.into(),
            simulate: false,
        }
    }

    pub fn with_config_source(mut self, name: impl Into<String>) -> Self {
        self.config_source = name.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.search_scopes.push(scope.into());
        self
    }

    pub fn with_runtime_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.runtime_parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_output_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.output_parameters.insert(key.into(), value.into());
        self
    }

    pub fn simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }
}
