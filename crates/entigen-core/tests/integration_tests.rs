//! Integration tests for entigen-core, with in-process fakes for every port.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use entigen_core::{
    application::{
        ApplicationError, ArtifactStatus, GenerationRequest, GenerationService, Registry,
        ports::{Filesystem, ScriptSource, TemplateRenderer, TemplateStore},
    },
    domain::ConfigError,
    error::{EntigenError, EntigenResult},
};
use serde_json::{Value, json};

// ----------------------------------------------------------------------------
// Fakes
// ----------------------------------------------------------------------------

#[derive(Clone, Default)]
struct FakeFs {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl FakeFs {
    fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files.lock().unwrap().clone()
    }

    fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn seed(&self, path: &str, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, _path: &Path) -> EntigenResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()> {
        *self.writes.lock().unwrap() += 1;
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> EntigenResult<Option<Vec<u8>>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(path)
            .map(|content| content.clone().into_bytes()))
    }
}

struct FakeScripts(BTreeMap<String, Value>);

impl ScriptSource for FakeScripts {
    fn load(&self, location: &str) -> EntigenResult<Value> {
        self.0
            .get(location)
            .cloned()
            .ok_or_else(|| EntigenError::load(location, "script not found"))
    }

    fn list(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }
}

#[derive(Default)]
struct FakeTemplates(Mutex<BTreeMap<String, String>>);

impl TemplateStore for FakeTemplates {
    fn get(&self, name: &str) -> EntigenResult<String> {
        self.0.lock().unwrap().get(name).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn contains(&self, name: &str) -> bool {
        self.0.lock().unwrap().contains_key(name)
    }

    fn list(&self) -> EntigenResult<Vec<String>> {
        Ok(self.0.lock().unwrap().keys().cloned().collect())
    }

    fn insert(&self, name: &str, source: String) -> EntigenResult<()> {
        self.0.lock().unwrap().insert(name.to_string(), source);
        Ok(())
    }
}

/// Replaces `{{a.b.c}}` with the string at that dotted path; missing is an error.
struct FakeRenderer;

impl TemplateRenderer for FakeRenderer {
    fn render(&self, name: &str, source: &str, model: &Value) -> EntigenResult<String> {
        let mut out = String::new();
        let mut rest = source;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let end = rest[start..].find("}}").map(|e| start + e).unwrap();
            let key = rest[start + 2..end].trim();
            let value = key
                .split('.')
                .try_fold(model, |v, k| v.get(k))
                .ok_or_else(|| ApplicationError::Render {
                    template: name.to_string(),
                    reason: format!("missing field '{key}'"),
                })?;
            match value {
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
            rest = &rest[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

// ----------------------------------------------------------------------------
// Fixtures
// ----------------------------------------------------------------------------

fn scripts() -> FakeScripts {
    FakeScripts(BTreeMap::from([
        (
            "Base".to_string(),
            json!({
                "generators": [
                    { "generator": "Root", "template": "readme", "file": "README.md" }
                ]
            }),
        ),
        (
            "Library".to_string(),
            json!({
                "inherits": ["Base"],
                "editor": "RouteTable",
                "generators": [
                    { "generator": "Entity", "template": "model", "file": "{{entity.name}}.txt", "directory": "model" },
                    { "generator": "EntityWebApi", "template": "api", "file": "{{entity.name}}Api.txt", "directory": "api" }
                ]
            }),
        ),
        (
            "Broken".to_string(),
            json!({ "generators": [{ "generator": "Entity", "template": "broken", "file": "x.txt" }] }),
        ),
        (
            "Clash".to_string(),
            json!({
                "generators": [
                    { "generator": "Root", "template": "readme", "file": "same.txt" },
                    { "generator": "Root", "template": "readme", "file": "same.txt" }
                ]
            }),
        ),
    ]))
}

fn templates() -> FakeTemplates {
    let store = FakeTemplates::default();
    store
        .insert("readme", "{{root.namespace}} by {{runtime.Company}}\n".into())
        .unwrap();
    store
        .insert("model", "{{entity.name}}\n{{entity.capabilities}}\n".into())
        .unwrap();
    store
        .insert("api", "{{entity.webApiRoutePrefix}}\n".into())
        .unwrap();
    store.insert("broken", "{{entity.nope}}".into()).unwrap();
    store
}

fn service(fs: &FakeFs) -> GenerationService {
    GenerationService::new(
        Box::new(scripts()),
        Box::new(templates()),
        Box::new(FakeRenderer),
        Box::new(fs.clone()),
        Registry::with_builtins(),
    )
}

fn config() -> Value {
    json!({
        "appName": "Hr",
        "entities": [
            {
                "name": "Person",
                "get": true,
                "create": true,
                "properties": [
                    { "name": "Id", "type": "Guid", "primaryKey": true },
                    { "name": "Name" }
                ]
            },
            { "name": "Audit", "properties": [{ "name": "At", "type": "DateTime" }] }
        ]
    })
}

fn request(script: &str) -> GenerationRequest {
    GenerationRequest::new(script, "/out").with_runtime_parameter("Company", "Acme")
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[test]
fn test_full_generation_workflow() {
    let fs = FakeFs::default();
    let stats = service(&fs).generate(&request("Library"), &config()).unwrap();

    assert_eq!(stats.created, 4);
    assert_eq!(stats.total(), 4);
    let files = fs.snapshot();
    assert_eq!(files[Path::new("/out/README.md")], "Acme.Hr by Acme\n");
    assert_eq!(
        files[Path::new("/out/model/Person.txt")],
        "Person\n[\"IIdentifier<Guid>\"]\n"
    );
    assert_eq!(files[Path::new("/out/api/PersonApi.txt")], "persons\n");
    // Audit has no operations, so no web API artifact.
    assert!(!files.contains_key(Path::new("/out/api/AuditApi.txt")));
}

#[test]
fn test_second_run_is_entirely_unchanged() {
    let fs = FakeFs::default();
    let service = service(&fs);
    service.generate(&request("Library"), &config()).unwrap();
    let writes_after_first = fs.writes();

    let second = service.generate(&request("Library"), &config()).unwrap();

    assert!(second.is_unchanged());
    assert_eq!(second.not_changed, second.total());
    assert_eq!(fs.writes(), writes_after_first);
}

#[test]
fn test_simulation_never_writes() {
    let fs = FakeFs::default();
    fs.seed("/out/README.md", "stale\n");
    let stats = service(&fs)
        .generate(&request("Library").simulate(true), &config())
        .unwrap();

    assert_eq!((stats.created, stats.updated), (3, 1));
    assert_eq!(fs.writes(), 0);
    assert_eq!(fs.snapshot().len(), 1);
    let readme = stats
        .artifacts
        .iter()
        .find(|a| a.path == Path::new("README.md"))
        .unwrap();
    assert_eq!(readme.status, ArtifactStatus::Updated);
}

#[test]
fn test_render_failure_aborts_before_any_write() {
    let fs = FakeFs::default();
    let err = service(&fs).generate(&request("Broken"), &config()).unwrap_err();

    assert!(matches!(
        err,
        EntigenError::Application(ApplicationError::Generation { .. })
    ));
    assert!(
        err.to_string()
            .starts_with("Generation failed [script: Broken, generator: Entity, node: Entity(Person)]")
    );
    assert_eq!(fs.writes(), 0);
}

#[test]
fn test_duplicate_output_paths_are_rejected() {
    let fs = FakeFs::default();
    let err = service(&fs).generate(&request("Clash"), &config()).unwrap_err();
    assert!(err.to_string().contains("rendered more than once"));
    assert_eq!(fs.writes(), 0);
}

#[test]
fn test_schema_errors_abort_with_qualified_path() {
    let fs = FakeFs::default();
    let doc = json!({
        "appName": "Hr",
        "entities": [{ "name": "Person", "delete": true }]
    });
    let err = service(&fs).generate(&request("Library"), &doc).unwrap_err();

    assert!(matches!(
        err,
        EntigenError::Config(ConfigError::MissingCapability { .. })
    ));
    assert!(err.to_string().starts_with("Entity(Person).Operation(Delete):"));
    assert_eq!(fs.writes(), 0);
}

#[test]
fn test_missing_runtime_parameter_is_reported() {
    let fs = FakeFs::default();
    let err = service(&fs)
        .generate(&GenerationRequest::new("Library", "/out"), &config())
        .unwrap_err();
    assert_eq!(err.to_string(), "Root: required field 'company' is missing");
}

#[test]
fn test_unknown_generator_lists_scopes() {
    let fs = FakeFs::default();
    let err = service(&fs)
        .generate(&request("Library").with_scope("acme"), &config())
        .unwrap_err();

    // Built-ins live in "entigen", which an explicit scope list must include.
    assert_eq!(
        err.to_string(),
        "Script 'Library' is invalid: Generator 'Root' not found, searched scopes: acme"
    );
}

#[test]
fn test_route_table_editor_runs_before_generators() {
    let fs = FakeFs::default();
    let mut scripts = scripts();
    scripts.0.insert(
        "Routes".into(),
        json!({
            "editor": "RouteTable",
            "generators": [{ "generator": "Root", "template": "routes", "file": "routes.txt" }]
        }),
    );
    let store = templates();
    store
        .insert("routes", "{{root.routes}}".into())
        .unwrap();
    let service = GenerationService::new(
        Box::new(scripts),
        Box::new(store),
        Box::new(FakeRenderer),
        Box::new(fs.clone()),
        Registry::with_builtins(),
    );

    service.generate(&request("Routes"), &config()).unwrap();

    let routes: Value =
        serde_json::from_str(&fs.snapshot()[Path::new("/out/routes.txt")]).unwrap();
    assert_eq!(routes.as_array().map(Vec::len), Some(2));
    assert_eq!(routes[1]["route"], json!("api/persons"));
}
