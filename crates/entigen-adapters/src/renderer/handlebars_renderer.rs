//! Handlebars renderer with naming helpers.

use entigen_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::naming,
    error::EntigenResult,
};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::Value;
use tracing::{instrument, trace};

/// Renders templates with Handlebars in strict mode: a reference to a
/// missing field is a render error rather than an empty string.
///
/// Naming helpers take one string: `{{camel entity.name}}`, `pascal`,
/// `snake`, `kebab`, `private`, `sentence`, `past_tense`, `lower` and
/// `upper`. `{{json value}}` writes any value as compact JSON. Output is
/// never HTML-escaped.
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("camel", Box::new(camel_helper));
        handlebars.register_helper("pascal", Box::new(pascal_helper));
        handlebars.register_helper("snake", Box::new(snake_helper));
        handlebars.register_helper("kebab", Box::new(kebab_helper));
        handlebars.register_helper("private", Box::new(private_helper));
        handlebars.register_helper("sentence", Box::new(sentence_helper));
        handlebars.register_helper("past_tense", Box::new(past_tense_helper));
        handlebars.register_helper("lower", Box::new(lower_helper));
        handlebars.register_helper("upper", Box::new(upper_helper));
        handlebars.register_helper("json", Box::new(json_helper));

        Self { handlebars }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    #[instrument(skip(self, source, model))]
    fn render(&self, name: &str, source: &str, model: &Value) -> EntigenResult<String> {
        let rendered = self
            .handlebars
            .render_template(source, model)
            .map_err(|e| ApplicationError::Render {
                template: name.to_string(),
                reason: e.to_string(),
            })?;
        trace!(bytes = rendered.len(), "template rendered");
        Ok(rendered)
    }
}

// Handlebars helpers

/// Apply `f` to the helper's first parameter, which must be a string.
fn write_transformed(
    h: &Helper,
    out: &mut dyn Output,
    f: impl Fn(&str) -> String,
) -> HelperResult {
    let text = match h.param(0).map(|p| p.value()) {
        Some(Value::String(s)) => s.clone(),
        Some(other @ (Value::Number(_) | Value::Bool(_))) => other.to_string(),
        Some(other) => {
            return Err(RenderErrorReason::Other(format!(
                "helper '{}' expects a string, got {other}",
                h.name()
            ))
            .into());
        }
        None => {
            return Err(RenderErrorReason::Other(format!(
                "helper '{}' requires one parameter",
                h.name()
            ))
            .into());
        }
    };
    out.write(&f(&text))?;
    Ok(())
}

fn camel_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, naming::to_camel_case)
}

fn pascal_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, naming::to_pascal_case)
}

fn snake_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, naming::to_snake_case)
}

fn kebab_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, naming::to_kebab_case)
}

fn private_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, naming::to_private_case)
}

fn sentence_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, naming::to_sentence_case)
}

fn past_tense_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, naming::past_tense)
}

fn lower_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, str::to_lowercase)
}

fn upper_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    write_transformed(h, out, str::to_uppercase)
}

fn json_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    if let Some(v) = h.param(0) {
        out.write(&serde_json::to_string(v.value()).unwrap_or_default())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(source: &str, model: Value) -> EntigenResult<String> {
        HandlebarsRenderer::new().render("test", source, &model)
    }

    #[test]
    fn naming_helpers() {
        let model = json!({ "name": "PersonId" });
        let out = render(
            "{{camel name}} {{pascal name}} {{snake name}} {{kebab name}} {{private name}} {{sentence name}}",
            model,
        )
        .unwrap();
        assert_eq!(out, "personId PersonId person_id person-id _personId Person Identifier");
    }

    #[test]
    fn case_and_tense_helpers() {
        let out = render(
            "{{lower v}} {{upper v}} {{past_tense v}}",
            json!({ "v": "Create" }),
        )
        .unwrap();
        assert_eq!(out, "create CREATE Created");
    }

    #[test]
    fn json_helper_serializes_values() {
        let out = render("{{json caps}}", json!({ "caps": ["IETag", "IChangeLog"] })).unwrap();
        assert_eq!(out, r#"["IETag","IChangeLog"]"#);
    }

    #[test]
    fn output_is_not_html_escaped() {
        let out = render("{{t}}", json!({ "t": "IIdentifier<Guid>" })).unwrap();
        assert_eq!(out, "IIdentifier<Guid>");
    }

    #[test]
    fn missing_fields_are_render_errors() {
        let err = render("{{entity.nope}}", json!({ "entity": {} })).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Template 'test' failed to render:")
        );
    }

    #[test]
    fn helpers_reject_objects() {
        let err = render("{{camel entity}}", json!({ "entity": { "a": 1 } })).unwrap_err();
        assert!(err.to_string().contains("helper 'camel' expects a string"));
    }

    #[test]
    fn iterates_collections() {
        let out = render(
            "{{#each props}}{{camel name}};{{/each}}",
            json!({ "props": [{ "name": "FirstName" }, { "name": "ETag" }] }),
        )
        .unwrap();
        assert_eq!(out, "firstName;etag;");
    }
}
