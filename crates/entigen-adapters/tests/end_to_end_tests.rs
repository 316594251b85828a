//! End-to-end generation with the real adapters and the built-in script.

use std::fs;

use entigen_adapters::{
    FileScriptSource, HandlebarsRenderer, InMemoryStore, LocalFilesystem, MemoryFilesystem, builtin,
    load_document,
};
use entigen_core::application::{
    ArtifactStatus, GenerationRequest, GenerationService, Registry,
};
use tempfile::TempDir;

const CONFIG: &str = r#"
company: Acme
appName: Hr
entities:
  - name: Person
    get: true
    create: true
    update: true
    delete: true
    properties:
      - name: Id
        type: Guid
        primaryKey: true
      - name: FirstName
      - name: ETag
"#;

fn service() -> GenerationService {
    GenerationService::new(
        Box::new(FileScriptSource::new()),
        Box::new(InMemoryStore::with_builtin().unwrap()),
        Box::new(HandlebarsRenderer::new()),
        Box::new(LocalFilesystem::new()),
        Registry::with_builtins(),
    )
}

fn setup() -> (TempDir, serde_json::Value) {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("entities.yaml");
    fs::write(&config_path, CONFIG).unwrap();
    let document = load_document(&config_path).unwrap();
    (temp, document)
}

fn request(temp: &TempDir) -> GenerationRequest {
    GenerationRequest::new(builtin::DEFAULT_SCRIPT, temp.path().join("out"))
}

#[test]
fn test_entity_library_generates_all_artifacts() {
    let (temp, document) = setup();
    let stats = service().generate(&request(&temp), &document).unwrap();

    assert_eq!(stats.created, 4);
    let out = temp.path().join("out");

    let model = fs::read_to_string(out.join("Acme.Hr/Entities/Person.cs")).unwrap();
    assert!(model.contains("public partial class Person : IIdentifier<Guid>, IETag"));
    assert!(model.contains("public Guid Id { get; set; }"));
    assert!(model.contains(r#"[JsonPropertyName("firstName")]"#));

    let manager = fs::read_to_string(out.join("Acme.Hr/Business/IPersonManager.cs")).unwrap();
    assert!(manager.contains("Task<Person?> GetAsync(Guid id);"));
    assert!(manager.contains("Task<Person> CreateAsync(Person value);"));
    assert!(manager.contains("Task DeleteAsync(Guid id);"));
    assert!(manager.contains("Publishes 'Acme.Hr.Person'"));

    let controller = fs::read_to_string(out.join("Acme.Hr/Api/PersonController.cs")).unwrap();
    assert!(controller.contains(r#"[Route("api/persons/{id}")]"#));
    assert!(controller.contains("[FromRoute] Guid id"));
    assert!(controller.contains("[FromBody] Person value"));

    let readme = fs::read_to_string(out.join("README.md")).unwrap();
    assert!(readme.contains("| Person | Get | GET | `api/persons/{id}` |"));
}

#[test]
fn test_second_run_changes_nothing() {
    let (temp, document) = setup();
    let service = service();
    service.generate(&request(&temp), &document).unwrap();

    let second = service.generate(&request(&temp), &document).unwrap();

    assert!(second.is_unchanged());
    assert_eq!(second.not_changed, 4);
}

#[test]
fn test_hand_edited_file_is_updated() {
    let (temp, document) = setup();
    let service = service();
    service.generate(&request(&temp), &document).unwrap();

    let readme = temp.path().join("out/README.md");
    let original = fs::read_to_string(&readme).unwrap();
    fs::write(&readme, "edited").unwrap();

    let stats = service.generate(&request(&temp), &document).unwrap();

    assert_eq!((stats.updated, stats.not_changed), (1, 3));
    assert_eq!(fs::read_to_string(&readme).unwrap(), original);
    let outcome = stats
        .artifacts
        .iter()
        .find(|a| a.path.ends_with("README.md"))
        .unwrap();
    assert_eq!(outcome.status, ArtifactStatus::Updated);
}

#[test]
fn test_binary_file_at_target_is_updated() {
    let (temp, document) = setup();
    let service = service();
    service.generate(&request(&temp), &document).unwrap();

    let readme = temp.path().join("out/README.md");
    fs::write(&readme, [0xff, 0xfe, 0x00]).unwrap();

    let stats = service.generate(&request(&temp), &document).unwrap();

    assert_eq!((stats.updated, stats.not_changed), (1, 3));
    assert!(fs::read_to_string(&readme).unwrap().contains("Person"));
}

#[test]
fn test_memory_filesystem_run_is_idempotent() {
    let (_temp, document) = setup();
    let memory = MemoryFilesystem::new();
    let service = GenerationService::new(
        Box::new(FileScriptSource::new()),
        Box::new(InMemoryStore::with_builtin().unwrap()),
        Box::new(HandlebarsRenderer::new()),
        Box::new(memory.clone()),
        Registry::with_builtins(),
    );
    let request = GenerationRequest::new(builtin::DEFAULT_SCRIPT, "/out");

    let first = service.generate(&request, &document).unwrap();
    let second = service.generate(&request, &document).unwrap();

    assert_eq!(first.created, 4);
    assert!(second.is_unchanged());
    assert_eq!(memory.write_count(), 4);
    assert!(memory.list_files().contains(&"/out/README.md".into()));
}

#[test]
fn test_simulation_leaves_disk_untouched() {
    let (temp, document) = setup();
    let stats = service()
        .generate(&request(&temp).simulate(true), &document)
        .unwrap();

    assert_eq!(stats.created, 4);
    assert!(stats.total_lines > 0);
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_invalid_config_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let document = serde_json::json!({
        "company": "Acme",
        "appName": "Hr",
        "entities": [{ "name": "Person", "get": true }]
    });

    let err = service().generate(&request(&temp), &document).unwrap_err();

    assert!(err.to_string().starts_with("Entity(Person).Operation(Get):"));
    assert!(!temp.path().join("out").exists());
}
