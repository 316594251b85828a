//! Generic document → typed configuration tree.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    domain::{RootConfig, RuntimeParameters, script::ROOT_CONFIG_TYPES},
    error::{EntigenError, EntigenResult},
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Build a tree of `config_type` from an already parsed document.
    ///
    /// The returned tree has every node's path wired and the caller's runtime
    /// parameters attached; nothing is prepared yet.
    #[instrument(skip(document, runtime_parameters))]
    pub fn load(
        source_name: &str,
        document: Value,
        config_type: &str,
        runtime_parameters: &RuntimeParameters,
    ) -> EntigenResult<RootConfig> {
        if !ROOT_CONFIG_TYPES.contains(&config_type) {
            return Err(EntigenError::load(
                source_name,
                format!("'{config_type}' is not a valid config type"),
            ));
        }

        match &document {
            Value::Null => return Err(EntigenError::load(source_name, "document is empty")),
            Value::Object(map) if map.is_empty() => {
                return Err(EntigenError::load(source_name, "document is empty"));
            }
            Value::Object(_) => {}
            _ => {
                return Err(EntigenError::load(
                    source_name,
                    "expected a mapping at the document root",
                ));
            }
        }

        let mut root: RootConfig = serde_json::from_value(document)
            .map_err(|e| EntigenError::load(source_name, e.to_string()))?;
        root.runtime_parameters = runtime_parameters.clone();
        root.wire();

        debug!(entities = root.entities.len(), "configuration loaded");
        Ok(root)
    }
}
