//! Application settings.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns settings; the core crate never sees them.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `ENTIGEN__*` environment variables, e.g. `ENTIGEN__GENERATION__SCRIPT`
//! 3. Settings file (`--settings`, else [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliResult;

/// Application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for `entigen generate`.
    pub generation: GenerationSettings,
    /// Template and script locations.
    pub templates: TemplateSettings,
    /// Output settings.
    pub output: OutputSettings,
    /// Log file settings.
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Script id or path used when `--script` is absent.
    pub script: String,
    /// Output root used when `--output` is absent.
    pub output: PathBuf,
    /// Lookup scopes used when no `--scope` is given.
    pub scopes: Vec<String>,
    /// Runtime parameters; `-p` overrides individual keys.
    pub parameters: BTreeMap<String, String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            script: entigen_adapters::builtin::DEFAULT_SCRIPT.into(),
            output: PathBuf::from("."),
            scopes: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory of `*.hbs` templates layered over the built-ins.
    pub directory: Option<PathBuf>,
    /// Directory searched for scripts requested by id.
    pub scripts_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// When set, log events are also appended to this file without ANSI codes.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load settings from defaults, the settings file and the environment.
    ///
    /// An explicit `settings_file` must exist; the default location is optional.
    pub fn load(settings_file: Option<&PathBuf>) -> CliResult<Self> {
        let file = match settings_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path()).required(false),
        };

        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("ENTIGEN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        debug!(script = %config.generation.script, "settings loaded");
        Ok(config)
    }

    /// Path to the default settings file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.entigen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "entigen", "entigen")
            .map(|d| d.config_dir().join("entigen.toml"))
            .unwrap_or_else(|| PathBuf::from(".entigen.toml"))
    }

    /// Templates directory: the flag wins over the setting.
    pub fn templates_directory<'a>(&'a self, flag: Option<&'a Path>) -> Option<&'a Path> {
        flag.or(self.templates.directory.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_use_builtin_script() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.generation.script, "EntityLibrary");
        assert_eq!(cfg.generation.output, PathBuf::from("."));
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entigen.toml");
        fs::write(
            &path,
            r#"
[generation]
script = "Api"
scopes = ["acme", "entigen"]

[generation.parameters]
Company = "Acme"

[templates]
directory = "templates"
"#,
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.generation.script, "Api");
        assert_eq!(cfg.generation.scopes, vec!["acme", "entigen"]);
        assert_eq!(
            cfg.generation.parameters.values().collect::<Vec<_>>(),
            vec!["Acme"]
        );
        assert_eq!(cfg.generation.output, PathBuf::from("."));
        assert_eq!(cfg.templates.directory, Some(PathBuf::from("templates")));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = PathBuf::from("/absolutely/does/not/exist/entigen.toml");
        let err = AppConfig::load(Some(&missing)).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn flag_wins_over_templates_setting() {
        let mut cfg = AppConfig::default();
        cfg.templates.directory = Some(PathBuf::from("from-settings"));

        assert_eq!(
            cfg.templates_directory(Some(Path::new("from-flag"))),
            Some(Path::new("from-flag"))
        );
        assert_eq!(
            cfg.templates_directory(None),
            Some(Path::new("from-settings"))
        );
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
