use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{
    ConstConfig, DefaultWhereAbsent, Diagnostics, ExtraProperties, NodeKind, NodePath,
    OperationConfig, PropertyConfig, RootConfig, check_deprecations, required_str, segment_name,
};
use crate::domain::{
    error::ConfigError,
    naming,
    value_objects::{DataSource, IDENTIFIER_TYPES, OperationKind},
};

/// Shorthand flags in the order their operations appear in the final list.
const SHORTHAND_ORDER: [OperationKind; 6] = [
    OperationKind::Get,
    OperationKind::GetAll,
    OperationKind::Create,
    OperationKind::Update,
    OperationKind::Patch,
    OperationKind::Delete,
];

/// An entity: its properties, operations and constants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityConfig {
    pub name: Option<String>,
    pub text: Option<String>,
    pub plural_name: Option<String>,
    pub private_name: Option<String>,
    pub argument_name: Option<String>,
    pub collection: Option<bool>,

    pub get: Option<bool>,
    pub get_all: Option<bool>,
    pub create: Option<bool>,
    pub update: Option<bool>,
    pub patch: Option<bool>,
    pub delete: Option<bool>,

    /// Explicitly declared capabilities (interfaces).
    pub implements: Option<Vec<String>>,
    pub data_source: Option<String>,
    pub event_publish: Option<bool>,
    pub event_subject_root: Option<String>,
    pub web_api_route_prefix: Option<String>,

    #[serde(default)]
    pub properties: Vec<PropertyConfig>,
    #[serde(default)]
    pub operations: Vec<OperationConfig>,
    #[serde(default)]
    pub consts: Vec<ConstConfig>,

    #[serde(flatten)]
    pub extra: ExtraProperties,

    // Derived from properties during phase one.
    #[serde(default, skip_deserializing)]
    pub primary_keys: Vec<PropertyConfig>,
    #[serde(default, skip_deserializing)]
    pub has_identifier: bool,
    #[serde(default, skip_deserializing)]
    pub identifier_type: Option<String>,
    #[serde(default, skip_deserializing)]
    pub etag_property: Option<String>,
    #[serde(default, skip_deserializing)]
    pub change_log_property: Option<String>,
    #[serde(default, skip_deserializing)]
    pub capabilities: Vec<String>,

    // Derived from operations at the end of phase two.
    #[serde(default, skip_deserializing)]
    pub manager_operations: Vec<OperationConfig>,
    #[serde(default, skip_deserializing)]
    pub data_operations: Vec<OperationConfig>,
    #[serde(default, skip_deserializing)]
    pub web_api_operations: Vec<OperationConfig>,
    #[serde(default, skip_deserializing)]
    pub event_operations: Vec<OperationConfig>,

    #[serde(skip)]
    pub(crate) path: NodePath,
    #[serde(skip)]
    pub(crate) data_source_kind: DataSource,
}

impl EntityConfig {
    pub(crate) fn wire(&mut self, path: NodePath) {
        for (i, p) in self.properties.iter_mut().enumerate() {
            p.path = path.child(NodeKind::Property, segment_name(p.name.as_deref(), i));
        }
        for (i, c) in self.consts.iter_mut().enumerate() {
            c.path = path.child(NodeKind::Const, segment_name(c.name.as_deref(), i));
        }
        for (i, op) in self.operations.iter_mut().enumerate() {
            op.wire(path.child(NodeKind::Operation, segment_name(op.name.as_deref(), i)));
        }
        self.path = path;
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source_kind
    }

    pub fn property(&self, name: &str) -> Option<&PropertyConfig> {
        self.properties.iter().find(|p| p.name.as_deref() == Some(name))
    }

    pub fn operation(&self, name: &str) -> Option<&OperationConfig> {
        self.operations.iter().find(|o| o.name.as_deref() == Some(name))
    }

    /// Phase one: own fields, shorthand operations, then children.
    pub(crate) fn prepare(
        &mut self,
        root: &RootConfig,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), ConfigError> {
        check_deprecations(NodeKind::Entity, &self.path, &mut self.extra, diagnostics)?;

        let name = required_str(&self.name, &self.path, "name")?.to_string();
        trace!(entity = %name, "preparing entity");

        self.text
            .default_where_absent(|| Some(naming::to_sentence_case(&name)));
        self.plural_name
            .default_where_absent(|| Some(naming::pluralize(&name)));
        self.private_name
            .default_where_absent(|| Some(naming::to_private_case(&name)));
        self.argument_name
            .default_where_absent(|| Some(naming::to_argument_case(&name)));
        self.collection.default_where_absent(|| Some(false));

        for flag in [
            &mut self.get,
            &mut self.get_all,
            &mut self.create,
            &mut self.update,
            &mut self.patch,
            &mut self.delete,
        ] {
            flag.default_where_absent(|| Some(false));
        }

        self.data_source
            .default_where_absent(|| root.data_source.clone());
        self.data_source_kind = crate::domain::value_objects::resolve_option(
            &mut self.data_source,
            root.data_source_kind,
            &self.path,
            "dataSource",
        )?;
        self.event_publish
            .default_where_absent(|| root.event_publish);
        self.event_subject_root
            .default_where_absent(|| root.event_subject_root.clone());
        let plural = self.plural_name.clone().unwrap_or_default();
        self.web_api_route_prefix
            .default_where_absent(|| Some(naming::to_kebab_case(&plural)));

        self.materialize_shorthand_operations();

        let mut properties = std::mem::take(&mut self.properties);
        for property in &mut properties {
            property.prepare(diagnostics)?;
        }
        self.properties = properties;
        self.infer_capabilities();

        let mut consts = std::mem::take(&mut self.consts);
        for c in &mut consts {
            c.prepare(diagnostics)?;
        }
        self.consts = consts;

        // Operations see this entity without its operation list.
        let mut operations = std::mem::take(&mut self.operations);
        for operation in &mut operations {
            operation.prepare(self, root, diagnostics)?;
        }
        self.operations = operations;

        Ok(())
    }

    /// Phase two: sibling operation references, then the cached views.
    pub(crate) fn resolve(&mut self) -> Result<(), ConfigError> {
        let siblings = self.operations.clone();
        for operation in &mut self.operations {
            operation.resolve(&siblings)?;
        }

        let ops = &self.operations;
        self.manager_operations = ops.iter().filter(|o| !o.is_manager_custom()).cloned().collect();
        self.data_operations = ops
            .iter()
            .filter(|o| o.data_source() != DataSource::None)
            .cloned()
            .collect();
        self.web_api_operations = ops
            .iter()
            .filter(|o| !o.is_web_api_excluded())
            .cloned()
            .collect();
        self.event_operations = ops
            .iter()
            .filter(|o| !o.published_events.is_empty())
            .cloned()
            .collect();
        Ok(())
    }

    /// Expand `get: true` and friends into operation nodes at the head of
    /// the list, skipping names that are already authored explicitly.
    fn materialize_shorthand_operations(&mut self) {
        let wants = |kind: OperationKind, e: &Self| -> bool {
            let flag = match kind {
                OperationKind::Get => e.get,
                OperationKind::GetAll => e.get_all,
                OperationKind::Create => e.create,
                OperationKind::Update => e.update,
                OperationKind::Patch => e.patch,
                OperationKind::Delete => e.delete,
                OperationKind::Custom => None,
            };
            flag == Some(true)
        };

        for kind in SHORTHAND_ORDER.iter().rev().copied() {
            let op_name = kind.to_string();
            if !wants(kind, self) || self.operation(&op_name).is_some() {
                continue;
            }
            let mut op = OperationConfig::shorthand(kind);
            if kind == OperationKind::Create && self.get == Some(true) {
                op.web_api_location = Some(format!("^{}", OperationKind::Get));
            }
            op.wire(self.path.child(NodeKind::Operation, op_name));
            self.operations.insert(0, op);
        }
    }

    /// Identifier, ETag and change-log capability inference.
    ///
    /// Final order: inferred identifier, explicit `implements`, ETag, change
    /// log; duplicates removed keeping the first occurrence.
    fn infer_capabilities(&mut self) {
        self.primary_keys = self
            .properties
            .iter()
            .filter(|p| p.is_primary_key())
            .cloned()
            .collect();

        let mut inferred = Vec::new();
        if let [key] = self.primary_keys.as_slice() {
            let key_type = key.type_name();
            if IDENTIFIER_TYPES.contains(&key_type) {
                self.has_identifier = true;
                self.identifier_type = Some(key_type.to_string());
                inferred.push(format!("IIdentifier<{key_type}>"));
            }
        }

        let mut trailing = Vec::new();
        if let Some(etag) = self
            .properties
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case("ETag") && p.type_name() == "string")
        {
            self.etag_property = Some(etag.name().to_string());
            trailing.push("IETag".to_string());
        }
        if let Some(log) = self.properties.iter().find(|p| p.type_name() == "ChangeLog") {
            self.change_log_property = Some(log.name().to_string());
            trailing.push("IChangeLog".to_string());
        }

        let explicit = self.implements.clone().unwrap_or_default();
        let mut capabilities: Vec<String> = Vec::new();
        for cap in inferred.into_iter().chain(explicit).chain(trailing) {
            if !capabilities.contains(&cap) {
                capabilities.push(cap);
            }
        }
        self.capabilities = capabilities;
    }
}
