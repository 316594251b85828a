use serde::{Deserialize, Serialize};

use super::{
    DefaultWhereAbsent, Diagnostics, EntityConfig, ExtraProperties, NodeKind, NodePath,
    OperationConfig, check_deprecations, required_str,
};
use crate::domain::{
    error::ConfigError,
    naming,
    value_objects::{LayerPassing, WebApiFrom, resolve_option},
};

/// A parameter of an operation.
///
/// A parameter linked to an entity property through `property` inherits the
/// property's type, text, nullability and argument/private names wherever it
/// leaves them unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterConfig {
    pub name: Option<String>,
    pub property: Option<String>,
    #[serde(rename = "type")]
    pub param_type: Option<String>,
    pub text: Option<String>,
    pub nullable: Option<bool>,
    pub argument_name: Option<String>,
    pub private_name: Option<String>,
    pub is_mandatory: Option<bool>,
    pub layer_passing: Option<String>,
    pub web_api_from: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraProperties,

    #[serde(skip)]
    pub(crate) path: NodePath,
    #[serde(skip)]
    pub(crate) layer_passing_kind: LayerPassing,
    #[serde(skip)]
    pub(crate) web_api_from_kind: WebApiFrom,
}

impl ParameterConfig {
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn layer_passing(&self) -> LayerPassing {
        self.layer_passing_kind
    }

    pub fn web_api_from(&self) -> WebApiFrom {
        self.web_api_from_kind
    }

    /// Argument name before preparation: explicit, else the linked
    /// property's, else derived from the parameter name.
    pub(crate) fn expected_argument_name(&self, entity: &EntityConfig) -> String {
        if let Some(arg) = &self.argument_name {
            return arg.clone();
        }
        self.property
            .as_deref()
            .or(self.name.as_deref())
            .and_then(|prop| entity.property(prop))
            .and_then(|p| p.argument_name.clone())
            .unwrap_or_else(|| naming::to_argument_case(self.name()))
    }

    /// `operation` has its route resolved and its parameter list moved out.
    pub(crate) fn prepare(
        &mut self,
        operation: &OperationConfig,
        entity: &EntityConfig,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), ConfigError> {
        check_deprecations(NodeKind::Parameter, &self.path, &mut self.extra, diagnostics)?;
        let name = required_str(&self.name, &self.path, "name")?.to_string();

        self.property.default_where_absent(|| {
            entity.property(&name).map(|p| p.name().to_string())
        });
        let linked = match self.property.as_deref() {
            Some(prop) => Some(entity.property(prop).ok_or_else(|| ConfigError::Reference {
                path: self.path.clone(),
                kind: "property",
                name: prop.to_string(),
            })?),
            None => None,
        };

        self.param_type
            .default_where_absent(|| linked.and_then(|p| p.prop_type.clone()))
            .default_where_absent(|| Some("string".into()));
        self.text
            .default_where_absent(|| linked.and_then(|p| p.text.clone()))
            .default_where_absent(|| Some(naming::to_sentence_case(&name)));
        self.nullable
            .default_where_absent(|| linked.and_then(|p| p.nullable))
            .default_where_absent(|| Some(false));
        self.argument_name
            .default_where_absent(|| linked.and_then(|p| p.argument_name.clone()))
            .default_where_absent(|| Some(naming::to_argument_case(&name)));
        self.private_name
            .default_where_absent(|| linked.and_then(|p| p.private_name.clone()))
            .default_where_absent(|| Some(naming::to_private_case(&name)));
        self.is_mandatory.default_where_absent(|| Some(false));

        self.layer_passing_kind = resolve_option(
            &mut self.layer_passing,
            LayerPassing::All,
            &self.path,
            "layerPassing",
        )?;

        let default_from = {
            let token = format!("{{{}}}", self.argument_name.as_deref().unwrap_or_default());
            if operation.route.contains(&token) {
                WebApiFrom::FromRoute
            } else if self.param_type.as_deref() == Some(entity.name())
                && self.layer_passing_kind == LayerPassing::ToManagerSet
            {
                WebApiFrom::FromBody
            } else {
                WebApiFrom::FromQuery
            }
        };
        self.web_api_from_kind =
            resolve_option(&mut self.web_api_from, default_from, &self.path, "webApiFrom")?;

        Ok(())
    }
}
