use serde::{Deserialize, Serialize};

use super::{
    DefaultWhereAbsent, Diagnostics, EntityConfig, ExtraProperties, NodeKind, NodePath,
    RuntimeParameters, check_deprecations, required_str, segment_name,
};
use crate::domain::{
    error::ConfigError,
    value_objects::{DataSource, EventActionFormat, resolve_option},
};

/// Runtime parameter consulted when `company` is not configured.
pub const COMPANY_PARAMETER: &str = "Company";
/// Runtime parameter consulted when `appName` is not configured.
pub const APP_NAME_PARAMETER: &str = "AppName";

/// The root of an entity configuration: global defaults plus the entities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootConfig {
    pub company: Option<String>,
    pub app_name: Option<String>,
    pub namespace: Option<String>,
    pub data_source: Option<String>,
    pub event_publish: Option<bool>,
    pub event_subject_root: Option<String>,
    pub event_subject_separator: Option<String>,
    pub event_action_format: Option<String>,
    pub web_api_route_prefix: Option<String>,

    #[serde(default)]
    pub entities: Vec<EntityConfig>,

    /// Supplied by the caller at generation time, never by the document.
    #[serde(default, skip_deserializing)]
    pub runtime_parameters: RuntimeParameters,

    #[serde(flatten)]
    pub extra: ExtraProperties,

    #[serde(skip)]
    pub(crate) data_source_kind: DataSource,
    #[serde(skip)]
    pub(crate) action_format: EventActionFormat,
}

impl RootConfig {
    /// Assign the qualified path of every node below the root.
    pub(crate) fn wire(&mut self) {
        let root = NodePath::root();
        for (i, entity) in self.entities.iter_mut().enumerate() {
            let path = root.child(NodeKind::Entity, segment_name(entity.name.as_deref(), i));
            entity.wire(path);
        }
    }

    /// Phase one for the root's own fields.
    pub(crate) fn prepare(&mut self, diagnostics: &mut Diagnostics) -> Result<(), ConfigError> {
        let path = NodePath::root();
        check_deprecations(NodeKind::Root, &path, &mut self.extra, diagnostics)?;

        let runtime = &self.runtime_parameters;
        self.company
            .default_where_absent(|| runtime.get(COMPANY_PARAMETER).cloned());
        self.app_name
            .default_where_absent(|| runtime.get(APP_NAME_PARAMETER).cloned());

        let company = required_str(&self.company, &path, "company")?.to_string();
        let app_name = required_str(&self.app_name, &path, "appName")?.to_string();

        self.namespace
            .default_where_absent(|| Some(format!("{company}.{app_name}")));
        self.data_source_kind = resolve_option(
            &mut self.data_source,
            DataSource::Database,
            &path,
            "dataSource",
        )?;
        self.event_publish.default_where_absent(|| Some(true));
        self.event_subject_root.default_where_absent(|| Some(company));
        self.event_subject_separator
            .default_where_absent(|| Some(".".into()));
        self.action_format = resolve_option(
            &mut self.event_action_format,
            EventActionFormat::None,
            &path,
            "eventActionFormat",
        )?;
        self.web_api_route_prefix
            .default_where_absent(|| Some("api".into()));

        Ok(())
    }

    pub fn app_name(&self) -> &str {
        self.app_name.as_deref().unwrap_or_default()
    }

    pub fn event_subject_separator(&self) -> &str {
        self.event_subject_separator.as_deref().unwrap_or(".")
    }

    pub fn action_format(&self) -> EventActionFormat {
        self.action_format
    }

    pub fn entity(&self, name: &str) -> Option<&EntityConfig> {
        self.entities.iter().find(|e| e.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> RootConfig {
        RootConfig {
            company: Some("Acme".into()),
            app_name: Some("Hr".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_resolved() {
        let mut root = root();
        root.prepare(&mut Diagnostics::new()).unwrap();

        assert_eq!(root.namespace.as_deref(), Some("Acme.Hr"));
        assert_eq!(root.data_source.as_deref(), Some("Database"));
        assert_eq!(root.event_publish, Some(true));
        assert_eq!(root.event_subject_root.as_deref(), Some("Acme"));
        assert_eq!(root.event_subject_separator(), ".");
        assert_eq!(root.web_api_route_prefix.as_deref(), Some("api"));
        assert_eq!(root.action_format(), EventActionFormat::None);
    }

    #[test]
    fn runtime_parameters_fill_missing_names() {
        let mut root = RootConfig::default();
        root.runtime_parameters
            .insert(COMPANY_PARAMETER.into(), "Contoso".into());
        root.runtime_parameters
            .insert(APP_NAME_PARAMETER.into(), "Sales".into());
        root.prepare(&mut Diagnostics::new()).unwrap();

        assert_eq!(root.company.as_deref(), Some("Contoso"));
        assert_eq!(root.app_name(), "Sales");
    }

    #[test]
    fn explicit_values_beat_runtime_parameters() {
        let mut root = root();
        root.runtime_parameters
            .insert(COMPANY_PARAMETER.into(), "Contoso".into());
        root.prepare(&mut Diagnostics::new()).unwrap();
        assert_eq!(root.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn missing_app_name_is_a_schema_error() {
        let mut root = RootConfig {
            company: Some("Acme".into()),
            ..Default::default()
        };
        let err = root.prepare(&mut Diagnostics::new()).unwrap_err();
        assert_eq!(err.to_string(), "Root: required field 'appName' is missing");
    }
}
