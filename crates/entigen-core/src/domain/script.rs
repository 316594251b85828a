//! Generation scripts: which generators run, with which templates, in
//! which order.

use serde::{Deserialize, Serialize};

/// Root configuration types a script may target.
pub const ROOT_CONFIG_TYPES: &[&str] = &["Entity"];

/// Config type assumed when a script does not declare one.
pub const DEFAULT_CONFIG_TYPE: &str = "Entity";

/// A script document as authored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScriptDocument {
    pub id: Option<String>,
    pub config_type: Option<String>,
    #[serde(default)]
    pub inherits: Vec<String>,
    pub editor: Option<String>,
    #[serde(default)]
    pub generators: Vec<GeneratorEntry>,
}

/// One generator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeneratorEntry {
    /// Implementation name, optionally qualified as `scope::Name`.
    pub generator: String,
    /// Template resource name.
    pub template: String,
    /// Output file name; itself a template.
    pub file: String,
    /// Output directory relative to the output root; itself a template.
    pub directory: Option<String>,
    pub text: Option<String>,
}

/// A script with its inheritance chain flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    pub id: String,
    pub config_type: String,
    pub editor: Option<String>,
    /// Inherited entries first, in declaration order.
    pub entries: Vec<GeneratorEntry>,
}

impl Script {
    pub fn is_known_config_type(&self) -> bool {
        ROOT_CONFIG_TYPES.contains(&self.config_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_camel_case_document() {
        let doc: ScriptDocument = serde_json::from_value(json!({
            "id": "Api",
            "configType": "Entity",
            "inherits": ["Base"],
            "generators": [
                { "generator": "Entity", "template": "entity_model", "file": "{{entity.name}}.rs" }
            ]
        }))
        .unwrap();

        assert_eq!(doc.inherits, vec!["Base"]);
        assert_eq!(doc.generators[0].directory, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_value::<ScriptDocument>(json!({ "generatorz": [] }));
        assert!(result.is_err());
    }
}
