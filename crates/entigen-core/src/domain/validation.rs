use std::collections::HashSet;

use tracing::instrument;

use crate::domain::{
    config::{EntityConfig, NodePath, PreparedConfig, RootConfig},
    error::ConfigError,
    value_objects::PRIMITIVE_TYPES,
};

/// Structural checks over a prepared tree.
///
/// Preparation already rejects missing fields and bad options node by node;
/// this pass checks what only the whole tree can answer: sibling uniqueness,
/// identifier shape and cross-entity type references.
pub struct ConfigValidator;

impl ConfigValidator {
    #[instrument(skip_all)]
    pub fn validate(config: &PreparedConfig) -> Result<(), ConfigError> {
        let root = config.root();
        let root_path = NodePath::root();

        unique(
            &root_path,
            "entity",
            root.entities.iter().map(|e| e.name()),
        )?;
        for entity in &root.entities {
            Self::validate_entity(root, entity)?;
        }
        Ok(())
    }

    fn validate_entity(root: &RootConfig, entity: &EntityConfig) -> Result<(), ConfigError> {
        identifier(entity.path(), entity.name())?;
        unique(entity.path(), "property", entity.properties.iter().map(|p| p.name()))?;
        unique(entity.path(), "operation", entity.operations.iter().map(|o| o.name()))?;
        unique(entity.path(), "const", entity.consts.iter().map(|c| c.name()))?;

        for property in &entity.properties {
            identifier(property.path(), property.name())?;
            known_type(root, property.path(), property.type_name())?;
        }

        for operation in &entity.operations {
            identifier(operation.path(), operation.name())?;
            unique(
                operation.path(),
                "parameter",
                operation.parameters.iter().map(|p| p.name()),
            )?;
            for parameter in &operation.parameters {
                identifier(parameter.path(), parameter.name())?;
                let ty = parameter.param_type.as_deref().unwrap_or_default();
                known_type(root, parameter.path(), ty)?;
            }
        }

        for c in &entity.consts {
            identifier(c.path(), c.name())?;
        }
        Ok(())
    }
}

fn unique<'a>(
    path: &NodePath,
    kind: &'static str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::Duplicate {
                path: path.clone(),
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn known_type(root: &RootConfig, path: &NodePath, ty: &str) -> Result<(), ConfigError> {
    if PRIMITIVE_TYPES.contains(&ty) || root.entity(ty).is_some() {
        return Ok(());
    }
    Err(ConfigError::Reference {
        path: path.clone(),
        kind: "type",
        name: ty.to_string(),
    })
}

fn identifier(path: &NodePath, name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::Schema {
            path: path.clone(),
            message: format!("'{name}' is not a valid identifier"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{EntityConfig, OperationConfig, ParameterConfig, PropertyConfig};

    fn root_with(entities: Vec<EntityConfig>) -> RootConfig {
        let mut root = RootConfig {
            company: Some("Acme".into()),
            app_name: Some("Hr".into()),
            entities,
            ..Default::default()
        };
        root.wire();
        root
    }

    fn entity(name: &str, properties: Vec<PropertyConfig>) -> EntityConfig {
        EntityConfig {
            name: Some(name.into()),
            properties,
            ..Default::default()
        }
    }

    fn property(name: &str, ty: &str) -> PropertyConfig {
        PropertyConfig {
            name: Some(name.into()),
            prop_type: Some(ty.into()),
            ..Default::default()
        }
    }

    fn check(root: RootConfig) -> Result<(), ConfigError> {
        ConfigValidator::validate(&PreparedConfig::prepare(root)?)
    }

    #[test]
    fn entity_typed_properties_are_accepted() {
        let root = root_with(vec![
            entity("Person", vec![property("Address", "Address")]),
            entity("Address", vec![property("Street", "string")]),
        ]);
        assert!(check(root).is_ok());
    }

    #[test]
    fn unknown_property_type_is_a_reference_error() {
        let root = root_with(vec![entity("Person", vec![property("Age", "Integer")])]);
        let err = check(root).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entity(Person).Property(Age): type 'Integer' does not exist"
        );
    }

    fn with_search_parameter(parameter: ParameterConfig) -> RootConfig {
        let mut person = entity("Person", vec![property("Code", "string")]);
        person.operations = vec![OperationConfig {
            name: Some("Search".into()),
            parameters: vec![parameter],
            ..Default::default()
        }];
        root_with(vec![person])
    }

    #[test]
    fn unknown_parameter_type_is_a_reference_error() {
        let root = with_search_parameter(ParameterConfig {
            name: Some("Filter".into()),
            param_type: Some("Foo".into()),
            ..Default::default()
        });
        let err = check(root).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entity(Person).Operation(Search).Parameter(Filter): type 'Foo' does not exist"
        );
    }

    #[test]
    fn entity_and_primitive_parameter_types_are_accepted() {
        let root = with_search_parameter(ParameterConfig {
            name: Some("Example".into()),
            param_type: Some("Person".into()),
            ..Default::default()
        });
        assert!(check(root).is_ok());

        let linked = with_search_parameter(ParameterConfig {
            name: Some("Code".into()),
            ..Default::default()
        });
        assert!(check(linked).is_ok());
    }

    #[test]
    fn parameter_linked_to_missing_property_is_rejected() {
        let root = with_search_parameter(ParameterConfig {
            name: Some("Key".into()),
            property: Some("Missing".into()),
            ..Default::default()
        });
        let err = check(root).unwrap_err();
        assert!(matches!(err, ConfigError::Reference { kind: "property", .. }));
    }

    #[test]
    fn duplicate_entity_names_are_rejected() {
        let root = root_with(vec![entity("Person", vec![]), entity("Person", vec![])]);
        let err = check(root).unwrap_err();
        assert!(matches!(err, ConfigError::Duplicate { kind: "entity", .. }));
    }

    #[test]
    fn duplicate_operation_names_are_rejected() {
        let mut person = entity("Person", vec![]);
        person.operations = vec![
            OperationConfig {
                name: Some("Archive".into()),
                ..Default::default()
            },
            OperationConfig {
                name: Some("Archive".into()),
                ..Default::default()
            },
        ];
        let err = check(root_with(vec![person])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Entity(Person): operation name 'Archive' is not unique"
        );
    }

    #[test]
    fn names_must_be_identifiers() {
        let root = root_with(vec![entity("Person", vec![property("first name", "string")])]);
        assert!(matches!(check(root), Err(ConfigError::Schema { .. })));
    }
}
