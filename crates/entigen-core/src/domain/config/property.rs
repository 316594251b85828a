use serde::{Deserialize, Serialize};

use super::{
    DefaultWhereAbsent, Diagnostics, ExtraProperties, NodeKind, NodePath, check_deprecations,
    required_str,
};
use crate::domain::{error::ConfigError, naming};

/// A property (field) of an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyConfig {
    pub name: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub prop_type: Option<String>,
    pub nullable: Option<bool>,
    pub primary_key: Option<bool>,
    pub json_name: Option<String>,
    pub argument_name: Option<String>,
    pub private_name: Option<String>,
    pub data_name: Option<String>,
    #[serde(rename = "default")]
    pub default_value: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: ExtraProperties,

    #[serde(skip)]
    pub(crate) path: NodePath,
}

impl PropertyConfig {
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn type_name(&self) -> &str {
        self.prop_type.as_deref().unwrap_or("string")
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key == Some(true)
    }

    pub(crate) fn prepare(&mut self, diagnostics: &mut Diagnostics) -> Result<(), ConfigError> {
        check_deprecations(NodeKind::Property, &self.path, &mut self.extra, diagnostics)?;
        let name = required_str(&self.name, &self.path, "name")?.to_string();

        self.text
            .default_where_absent(|| Some(naming::to_sentence_case(&name)));
        self.prop_type.default_where_absent(|| Some("string".into()));
        self.nullable.default_where_absent(|| Some(false));
        self.primary_key.default_where_absent(|| Some(false));
        self.json_name
            .default_where_absent(|| Some(naming::to_camel_case(&name)));
        self.argument_name
            .default_where_absent(|| Some(naming::to_argument_case(&name)));
        self.private_name
            .default_where_absent(|| Some(naming::to_private_case(&name)));
        self.data_name.default_where_absent(|| Some(name.clone()));
        Ok(())
    }
}
