use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{
    DefaultWhereAbsent, Diagnostics, EntityConfig, ExtraProperties, NodeKind, NodePath,
    ParameterConfig, RootConfig, check_deprecations, required_str, segment_name,
};
use crate::domain::{
    error::ConfigError,
    naming,
    value_objects::{
        ConfigOption, DataSource, EventActionFormat, LayerPassing, OperationKind, resolve_option,
    },
};

/// Prefix marking `webApiLocation` as a reference to a sibling operation.
const SIBLING_REFERENCE: char = '^';

/// Name of the parameter carrying the entity value for Create/Update/Patch.
pub const VALUE_PARAMETER: &str = "value";

/// One event an operation publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    pub subject: String,
    pub action: String,
}

/// An operation exposed by an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationConfig {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub op_type: Option<String>,
    pub text: Option<String>,
    pub return_type: Option<String>,
    pub return_nullable: Option<bool>,
    pub manager_custom: Option<bool>,
    pub data_source: Option<String>,
    pub exclude_web_api: Option<bool>,
    pub web_api_method: Option<String>,
    pub web_api_route: Option<String>,
    /// Literal location, or `^Name` to mirror a sibling operation's route.
    pub web_api_location: Option<String>,
    pub event_publish: Option<bool>,
    /// `subject:action` pairs separated by `;`. Either half may be empty.
    pub events: Option<String>,
    pub event_subject: Option<String>,
    pub event_action: Option<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,

    #[serde(flatten)]
    pub extra: ExtraProperties,

    #[serde(default, skip_deserializing)]
    pub route: String,
    #[serde(default, skip_deserializing)]
    pub location: Option<String>,
    #[serde(default, skip_deserializing)]
    pub published_events: Vec<EventConfig>,

    #[serde(skip)]
    pub(crate) path: NodePath,
    #[serde(skip)]
    pub(crate) kind: OperationKind,
    #[serde(skip)]
    pub(crate) data_source_kind: DataSource,
}

impl OperationConfig {
    /// An operation synthesized from an entity shorthand flag.
    pub(crate) fn shorthand(kind: OperationKind) -> Self {
        Self {
            name: Some(kind.to_string()),
            op_type: Some(kind.to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn wire(&mut self, path: NodePath) {
        for (i, p) in self.parameters.iter_mut().enumerate() {
            p.path = path.child(NodeKind::Parameter, segment_name(p.name.as_deref(), i));
        }
        self.path = path;
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source_kind
    }

    pub fn is_manager_custom(&self) -> bool {
        self.manager_custom == Some(true)
    }

    pub fn is_web_api_excluded(&self) -> bool {
        self.exclude_web_api == Some(true)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterConfig> {
        self.parameters.iter().find(|p| p.name.as_deref() == Some(name))
    }

    /// Phase one. `entity` has its properties prepared but its operation list
    /// moved out.
    pub(crate) fn prepare(
        &mut self,
        entity: &EntityConfig,
        root: &RootConfig,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), ConfigError> {
        check_deprecations(NodeKind::Operation, &self.path, &mut self.extra, diagnostics)?;
        let name = required_str(&self.name, &self.path, "name")?.to_string();
        self.kind = resolve_option(&mut self.op_type, OperationKind::Custom, &self.path, "type")?;
        let kind = self.kind;
        trace!(operation = %self.path, %kind, "preparing operation");

        let entity_name = entity.name();
        let entity_text = entity.text.as_deref().unwrap_or(entity_name);
        self.text.default_where_absent(|| {
            Some(match kind {
                OperationKind::Get => format!("Gets the specified {entity_text}"),
                OperationKind::GetAll => format!("Gets the {entity_text} collection"),
                OperationKind::Create => format!("Creates a new {entity_text}"),
                OperationKind::Update => format!("Updates an existing {entity_text}"),
                OperationKind::Patch => format!("Patches an existing {entity_text}"),
                OperationKind::Delete => format!("Deletes the specified {entity_text}"),
                OperationKind::Custom => naming::to_sentence_case(&name),
            })
        });
        self.return_type.default_where_absent(|| {
            Some(match kind {
                OperationKind::Get
                | OperationKind::Create
                | OperationKind::Update
                | OperationKind::Patch => entity_name.to_string(),
                OperationKind::GetAll => format!("{entity_name}Collection"),
                OperationKind::Delete | OperationKind::Custom => "void".to_string(),
            })
        });
        self.return_nullable
            .default_where_absent(|| Some(kind == OperationKind::Get));
        self.manager_custom.default_where_absent(|| Some(false));
        self.exclude_web_api.default_where_absent(|| Some(false));

        self.data_source
            .default_where_absent(|| entity.data_source.clone());
        self.data_source_kind = resolve_option(
            &mut self.data_source,
            entity.data_source(),
            &self.path,
            "dataSource",
        )?;
        self.web_api_method
            .default_where_absent(|| Some(kind.http_method().to_string()));

        if self.parameters.is_empty() {
            self.parameters = self.default_parameters(entity)?;
        }

        let route_tokens = self.route_tokens(entity);
        self.web_api_route.default_where_absent(|| {
            Some(match kind {
                k if k.is_keyed() => route_tokens,
                OperationKind::Custom => naming::to_kebab_case(&name),
                _ => String::new(),
            })
        });
        self.route = [
            root.web_api_route_prefix.as_deref(),
            entity.web_api_route_prefix.as_deref(),
            self.web_api_route.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

        let has_events = self.events.is_some();
        self.event_publish.default_where_absent(|| {
            if has_events {
                Some(true)
            } else if kind.is_mutating() {
                entity.event_publish
            } else {
                Some(false)
            }
        });
        self.published_events = if self.event_publish == Some(true) {
            self.derive_events(entity, root)
        } else {
            Vec::new()
        };

        let mut parameters = std::mem::take(&mut self.parameters);
        for parameter in &mut parameters {
            parameter.prepare(self, entity, diagnostics)?;
        }
        self.parameters = parameters;

        Ok(())
    }

    /// Phase two: resolve `^Sibling` locations against fully prepared siblings.
    pub(crate) fn resolve(&mut self, siblings: &[OperationConfig]) -> Result<(), ConfigError> {
        self.location = match self.web_api_location.as_deref() {
            Some(loc) if loc.starts_with(SIBLING_REFERENCE) => {
                let target = &loc[SIBLING_REFERENCE.len_utf8()..];
                let sibling = siblings
                    .iter()
                    .find(|s| s.name() == target)
                    .ok_or_else(|| ConfigError::Reference {
                        path: self.path.clone(),
                        kind: "operation",
                        name: target.to_string(),
                    })?;
                Some(sibling.result_location())
            }
            Some(loc) => Some(loc.to_string()),
            None => None,
        };
        Ok(())
    }

    /// This operation's route with each `{argName}` token replaced by the
    /// matching `{result.Property}` accessor.
    fn result_location(&self) -> String {
        self.parameters.iter().fold(self.route.clone(), |route, p| {
            let arg = p.argument_name.clone().unwrap_or_else(|| p.name().to_string());
            let property = p.property.as_deref().unwrap_or(p.name());
            route.replace(&format!("{{{arg}}}"), &format!("{{result.{property}}}"))
        })
    }

    fn default_parameters(
        &self,
        entity: &EntityConfig,
    ) -> Result<Vec<ParameterConfig>, ConfigError> {
        let mut params = Vec::new();

        if self.kind.takes_value() {
            params.push(ParameterConfig {
                name: Some(VALUE_PARAMETER.into()),
                param_type: Some(entity.name().to_string()),
                text: Some(format!("The {}", entity.text.as_deref().unwrap_or(entity.name()))),
                layer_passing: Some(LayerPassing::ToManagerSet.to_string()),
                is_mandatory: Some(true),
                ..Default::default()
            });
        }

        if self.kind.is_keyed() {
            if entity.primary_keys.is_empty() {
                return Err(ConfigError::MissingCapability {
                    path: self.path.clone(),
                    kind: self.kind.to_string(),
                    capability: "a primary key",
                });
            }
            params.extend(entity.primary_keys.iter().map(|key| ParameterConfig {
                name: key.name.clone(),
                property: key.name.clone(),
                is_mandatory: Some(true),
                ..Default::default()
            }));
        }

        for (i, p) in params.iter_mut().enumerate() {
            p.path = self
                .path
                .child(NodeKind::Parameter, segment_name(p.name.as_deref(), i));
        }
        Ok(params)
    }

    /// `{argName}` tokens of the key parameters, joined with `/`.
    fn route_tokens(&self, entity: &EntityConfig) -> String {
        self.parameters
            .iter()
            .filter(|p| {
                p.layer_passing
                    .as_deref()
                    .and_then(LayerPassing::parse_option)
                    .is_none_or(|lp| lp == LayerPassing::All)
            })
            .map(|p| format!("{{{}}}", p.expected_argument_name(entity)))
            .collect::<Vec<_>>()
            .join("/")
    }

    fn derive_events(&self, entity: &EntityConfig, root: &RootConfig) -> Vec<EventConfig> {
        let default_subject = self.event_subject.clone().unwrap_or_else(|| {
            [
                entity.event_subject_root.as_deref().unwrap_or_default(),
                root.app_name(),
                entity.name(),
            ]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(root.event_subject_separator())
        });
        let default_action = self.event_action.clone().unwrap_or_else(|| {
            let verb = self.kind.event_verb().unwrap_or(self.name());
            match root.action_format() {
                EventActionFormat::PastTense => naming::past_tense(verb),
                EventActionFormat::None => verb.to_string(),
            }
        });

        let Some(events) = self.events.as_deref() else {
            return vec![EventConfig {
                subject: default_subject,
                action: default_action,
            }];
        };

        let pairs: Vec<EventConfig> = events
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|pair| {
                let (subject, action) = pair.split_once(':').unwrap_or((pair, ""));
                let pick = |explicit: &str, fallback: &str| {
                    let explicit = explicit.trim();
                    if explicit.is_empty() {
                        fallback.to_string()
                    } else {
                        explicit.to_string()
                    }
                };
                EventConfig {
                    subject: pick(subject, &default_subject),
                    action: pick(action, &default_action),
                }
            })
            .collect();

        if pairs.is_empty() {
            vec![EventConfig {
                subject: default_subject,
                action: default_action,
            }]
        } else {
            pairs
        }
    }
}
