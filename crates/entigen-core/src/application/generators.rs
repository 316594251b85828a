//! Generator and editor implementations, and the built-in set.
//!
//! A generator decides *which* nodes a script entry renders for; the entry's
//! template decides *what* gets rendered. An editor mutates the prepared tree
//! once before any generator runs.

use serde_json::json;

use crate::{
    domain::{EntityConfig, NodePath, RootConfig, script::DEFAULT_CONFIG_TYPE},
    error::EntigenResult,
};

/// A node a generator entry renders once for.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    Root,
    Entity(&'a EntityConfig),
}

impl Selection<'_> {
    pub fn path(&self) -> NodePath {
        match self {
            Self::Root => NodePath::root(),
            Self::Entity(e) => e.path().clone(),
        }
    }

    pub fn entity(&self) -> Option<&EntityConfig> {
        match self {
            Self::Root => None,
            Self::Entity(e) => Some(e),
        }
    }
}

pub trait Generator: Send + Sync {
    /// Root config type this generator works on.
    fn config_type(&self) -> &str {
        DEFAULT_CONFIG_TYPE
    }

    /// Nodes to render for, in output order.
    fn select<'a>(&self, root: &'a RootConfig) -> Vec<Selection<'a>>;
}

/// Mutates a prepared configuration before generation.
pub trait ConfigEditor: Send + Sync {
    fn edit(&self, root: &mut RootConfig) -> EntigenResult<()>;
}

/// Renders once for the root.
pub struct RootGenerator;

impl Generator for RootGenerator {
    fn select<'a>(&self, _root: &'a RootConfig) -> Vec<Selection<'a>> {
        vec![Selection::Root]
    }
}

/// Renders once per entity.
pub struct EntityGenerator;

impl Generator for EntityGenerator {
    fn select<'a>(&self, root: &'a RootConfig) -> Vec<Selection<'a>> {
        root.entities.iter().map(Selection::Entity).collect()
    }
}

/// Renders for each entity with at least one manager-layer operation.
pub struct EntityManagerGenerator;

impl Generator for EntityManagerGenerator {
    fn select<'a>(&self, root: &'a RootConfig) -> Vec<Selection<'a>> {
        root.entities
            .iter()
            .filter(|e| !e.manager_operations.is_empty())
            .map(Selection::Entity)
            .collect()
    }
}

/// Renders for each entity exposing at least one web API operation.
pub struct EntityWebApiGenerator;

impl Generator for EntityWebApiGenerator {
    fn select<'a>(&self, root: &'a RootConfig) -> Vec<Selection<'a>> {
        root.entities
            .iter()
            .filter(|e| !e.web_api_operations.is_empty())
            .map(Selection::Entity)
            .collect()
    }
}

/// Adds a `routes` table to the root's extra properties: one row per web
/// API operation across all entities.
pub struct RouteTableEditor;

impl ConfigEditor for RouteTableEditor {
    fn edit(&self, root: &mut RootConfig) -> EntigenResult<()> {
        let routes: Vec<_> = root
            .entities
            .iter()
            .flat_map(|e| {
                e.web_api_operations.iter().map(move |op| {
                    json!({
                        "entity": e.name(),
                        "operation": op.name(),
                        "method": op.web_api_method,
                        "route": op.route,
                    })
                })
            })
            .collect();

        root.extra.insert("routes".into(), json!(routes));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OperationConfig, PreparedConfig, PropertyConfig};

    fn prepared() -> RootConfig {
        let mut root = RootConfig {
            company: Some("Acme".into()),
            app_name: Some("Hr".into()),
            entities: vec![
                EntityConfig {
                    name: Some("Person".into()),
                    get: Some(true),
                    properties: vec![PropertyConfig {
                        name: Some("Id".into()),
                        prop_type: Some("int".into()),
                        primary_key: Some(true),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                EntityConfig {
                    name: Some("Lookup".into()),
                    operations: vec![OperationConfig {
                        name: Some("Refresh".into()),
                        manager_custom: Some(true),
                        exclude_web_api: Some(true),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        root.wire();
        PreparedConfig::prepare(root).unwrap().into_root()
    }

    fn names(selection: &[Selection<'_>]) -> Vec<String> {
        selection.iter().map(|s| s.path().to_string()).collect()
    }

    #[test]
    fn builtin_selections() {
        let root = prepared();

        assert_eq!(names(&RootGenerator.select(&root)), vec!["Root"]);
        assert_eq!(
            names(&EntityGenerator.select(&root)),
            vec!["Entity(Person)", "Entity(Lookup)"]
        );
        assert_eq!(names(&EntityManagerGenerator.select(&root)), vec!["Entity(Person)"]);
        assert_eq!(names(&EntityWebApiGenerator.select(&root)), vec!["Entity(Person)"]);
    }

    #[test]
    fn route_table_lists_web_api_operations() {
        let mut root = prepared();
        RouteTableEditor.edit(&mut root).unwrap();

        assert_eq!(
            root.extra["routes"],
            json!([{ "entity": "Person", "operation": "Get", "method": "GET", "route": "api/persons/{id}" }])
        );
    }
}
