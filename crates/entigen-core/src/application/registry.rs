//! Name → factory registry for generators and editors.
//!
//! Scripts name implementations as strings. Names resolve against the
//! request's search scopes in order; `scope::Name` pins a single scope.

use std::{collections::BTreeMap, fmt, sync::Arc};

use tracing::debug;

use crate::{
    application::{
        ApplicationError,
        generators::{
            ConfigEditor, EntityGenerator, EntityManagerGenerator, EntityWebApiGenerator,
            Generator, RootGenerator, RouteTableEditor,
        },
    },
    error::EntigenResult,
};

/// Scope of the built-in implementations, searched when a request names none.
pub const DEFAULT_SCOPE: &str = "entigen";

pub type GeneratorFactory = Arc<dyn Fn() -> EntigenResult<Box<dyn Generator>> + Send + Sync>;
pub type EditorFactory = Arc<dyn Fn() -> EntigenResult<Box<dyn ConfigEditor>> + Send + Sync>;

#[derive(Default, Clone)]
pub struct Registry {
    generators: BTreeMap<(String, String), GeneratorFactory>,
    editors: BTreeMap<(String, String), EditorFactory>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("generators", &self.generator_names())
            .field("editors", &self.editor_names())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in generators and editors.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_generator(DEFAULT_SCOPE, "Root", generator_factory(|| RootGenerator))
            .register_generator(DEFAULT_SCOPE, "Entity", generator_factory(|| EntityGenerator))
            .register_generator(
                DEFAULT_SCOPE,
                "EntityManager",
                generator_factory(|| EntityManagerGenerator),
            )
            .register_generator(
                DEFAULT_SCOPE,
                "EntityWebApi",
                generator_factory(|| EntityWebApiGenerator),
            )
            .register_editor(DEFAULT_SCOPE, "RouteTable", editor_factory(|| RouteTableEditor));
        registry
    }

    pub fn register_generator(
        &mut self,
        scope: impl Into<String>,
        name: impl Into<String>,
        factory: GeneratorFactory,
    ) -> &mut Self {
        self.generators.insert((scope.into(), name.into()), factory);
        self
    }

    pub fn register_editor(
        &mut self,
        scope: impl Into<String>,
        name: impl Into<String>,
        factory: EditorFactory,
    ) -> &mut Self {
        self.editors.insert((scope.into(), name.into()), factory);
        self
    }

    /// Resolve and construct a generator.
    pub fn generator(&self, name: &str, scopes: &[String]) -> EntigenResult<Box<dyn Generator>> {
        let factory = lookup(&self.generators, "Generator", name, scopes)?;
        factory().map_err(|e| construction_failed("Generator", name, &e))
    }

    /// Resolve and construct an editor.
    pub fn editor(&self, name: &str, scopes: &[String]) -> EntigenResult<Box<dyn ConfigEditor>> {
        let factory = lookup(&self.editors, "Editor", name, scopes)?;
        factory().map_err(|e| construction_failed("Editor", name, &e))
    }

    /// Qualified names of all registered generators, `scope::Name`.
    pub fn generator_names(&self) -> Vec<String> {
        qualified(self.generators.keys())
    }

    pub fn editor_names(&self) -> Vec<String> {
        qualified(self.editors.keys())
    }
}

/// Factory for a generator that cannot fail to construct.
pub fn generator_factory<G>(make: impl Fn() -> G + Send + Sync + 'static) -> GeneratorFactory
where
    G: Generator + 'static,
{
    Arc::new(move || -> EntigenResult<Box<dyn Generator>> { Ok(Box::new(make())) })
}

/// Factory for an editor that cannot fail to construct.
pub fn editor_factory<E>(make: impl Fn() -> E + Send + Sync + 'static) -> EditorFactory
where
    E: ConfigEditor + 'static,
{
    Arc::new(move || -> EntigenResult<Box<dyn ConfigEditor>> { Ok(Box::new(make())) })
}

/// Scopes to search: the request's, or the built-in scope when it gives none.
pub fn effective_scopes(scopes: &[String]) -> Vec<String> {
    if scopes.is_empty() {
        vec![DEFAULT_SCOPE.to_string()]
    } else {
        scopes.to_vec()
    }
}

fn lookup<'r, F>(
    table: &'r BTreeMap<(String, String), F>,
    kind: &'static str,
    name: &str,
    scopes: &[String],
) -> EntigenResult<&'r F> {
    let searched = match name.split_once("::") {
        Some((scope, _)) => vec![scope.to_string()],
        None => effective_scopes(scopes),
    };
    let bare = name.split_once("::").map_or(name, |(_, n)| n);

    searched
        .iter()
        .find_map(|scope| table.get(&(scope.clone(), bare.to_string())))
        .inspect(|_| debug!(kind, name, "resolved implementation"))
        .ok_or_else(|| {
            ApplicationError::UnknownImplementation {
                kind,
                name: name.to_string(),
                scopes: searched.clone(),
            }
            .into()
        })
}

fn construction_failed(
    kind: &'static str,
    name: &str,
    source: &crate::error::EntigenError,
) -> crate::error::EntigenError {
    ApplicationError::ConstructionFailed {
        kind,
        name: name.to_string(),
        reason: source.to_string(),
    }
    .into()
}

fn qualified<'a>(keys: impl Iterator<Item = &'a (String, String)>) -> Vec<String> {
    keys.map(|(scope, name)| format!("{scope}::{name}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntigenError;

    #[test]
    fn builtins_resolve_in_default_scope() {
        let registry = Registry::with_builtins();
        assert!(registry.generator("Entity", &[]).is_ok());
        assert!(registry.generator("entigen::EntityWebApi", &["acme".into()]).is_ok());
        assert!(registry.editor("RouteTable", &[]).is_ok());
        assert_eq!(registry.generator_names().len(), 4);
    }

    #[test]
    fn first_matching_scope_wins() {
        let mut registry = Registry::with_builtins();
        registry.register_generator("acme", "Entity", generator_factory(|| RootGenerator));

        let scopes = vec!["acme".to_string(), DEFAULT_SCOPE.to_string()];
        let generator = registry.generator("Entity", &scopes).unwrap();
        let root = crate::domain::RootConfig::default();
        // RootGenerator selects the root even with no entities.
        assert_eq!(generator.select(&root).len(), 1);
    }

    #[test]
    fn unknown_name_reports_searched_scopes() {
        let registry = Registry::with_builtins();
        let err = registry
            .generator("Repository", &["acme".into(), "entigen".into()])
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Generator 'Repository' not found, searched scopes: acme, entigen"
        );
    }

    #[test]
    fn failing_factory_is_construction_failure() {
        let mut registry = Registry::new();
        registry.register_generator(
            DEFAULT_SCOPE,
            "Broken",
            Arc::new(|| -> EntigenResult<Box<dyn Generator>> {
                Err(EntigenError::Internal {
                    message: "no license".into(),
                })
            }),
        );

        let err = registry.generator("Broken", &[]).err().unwrap();
        assert!(matches!(
            err,
            EntigenError::Application(ApplicationError::ConstructionFailed { .. })
        ));
    }
}
