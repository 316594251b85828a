use serde::{Deserialize, Serialize};

use super::{
    DefaultWhereAbsent, Diagnostics, ExtraProperties, NodeKind, NodePath, check_deprecations,
    required, required_str,
};
use crate::domain::{error::ConfigError, naming};

/// A named constant value declared on an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstConfig {
    pub name: Option<String>,
    pub value: Option<serde_json::Value>,
    pub text: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraProperties,

    #[serde(skip)]
    pub(crate) path: NodePath,
}

impl ConstConfig {
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub(crate) fn prepare(&mut self, diagnostics: &mut Diagnostics) -> Result<(), ConfigError> {
        check_deprecations(NodeKind::Const, &self.path, &mut self.extra, diagnostics)?;
        let name = required_str(&self.name, &self.path, "name")?.to_string();
        required(&self.value, &self.path, "value")?;

        self.text
            .default_where_absent(|| Some(naming::to_sentence_case(&name)));
        Ok(())
    }
}
