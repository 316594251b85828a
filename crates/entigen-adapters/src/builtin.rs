//! Templates and scripts that ship with Entigen.
//!
//! Both are embedded at compile time, so the binary works without any
//! template directory on disk. A directory loaded later overrides a
//! built-in of the same name.

/// Built-in templates as `(name, source)`.
pub const TEMPLATES: &[(&str, &str)] = &[
    ("readme", include_str!("../templates/readme.hbs")),
    ("entity_model", include_str!("../templates/entity_model.hbs")),
    ("entity_manager", include_str!("../templates/entity_manager.hbs")),
    ("entity_web_api", include_str!("../templates/entity_web_api.hbs")),
];

/// Id of the script used when none is requested.
pub const DEFAULT_SCRIPT: &str = "EntityLibrary";

/// Built-in scripts as `(id, yaml source)`.
pub const SCRIPTS: &[(&str, &str)] = &[(
    DEFAULT_SCRIPT,
    include_str!("../scripts/EntityLibrary.yaml"),
)];

/// Source of a built-in script by id.
pub fn script(id: &str) -> Option<&'static str> {
    SCRIPTS
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, source)| *source)
}
