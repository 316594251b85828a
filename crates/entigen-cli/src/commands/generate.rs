//! Implementation of the `entigen generate` command.

use std::path::{Path, PathBuf};

use entigen_adapters::load_document;
use entigen_core::{
    application::{GenerationRequest, GenerationStatistics},
    domain::{APP_NAME_PARAMETER, COMPANY_PARAMETER},
};
use tracing::{info, instrument};

use crate::{
    cli::GenerateArgs,
    commands::build_service,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(config = %args.config.display()))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let simulate = args.simulate || args.expect_no_changes;
    let script = args
        .script
        .clone()
        .unwrap_or_else(|| config.generation.script.clone());

    let document = load_document(&args.config)?;
    let service = build_service(&config, args.templates.as_deref(), &script_directories(&script))?;
    let request = build_request(&args, &config, script, simulate);
    if request.output_root.is_file() {
        return Err(CliError::InvalidInput {
            message: format!(
                "output '{}' is a file, expected a directory",
                request.output_root.display()
            ),
        });
    }

    let spinner = output.spinner("Generating...");
    let result = service.generate(&request, &document);
    spinner.finish_and_clear();
    let stats = result?;

    info!(
        created = stats.created,
        updated = stats.updated,
        not_changed = stats.not_changed,
        "generate finished"
    );
    output.statistics(&stats, simulate)?;
    check_expectation(&args, &stats)
}

/// Merge settings and flags into a request. Flags win.
fn build_request(
    args: &GenerateArgs,
    config: &AppConfig,
    script: String,
    simulate: bool,
) -> GenerationRequest {
    let output_root = args
        .output
        .clone()
        .unwrap_or_else(|| config.generation.output.clone());

    let mut request = GenerationRequest::new(script, output_root)
        .with_config_source(args.config.display().to_string())
        .simulate(simulate);

    let scopes = if args.scopes.is_empty() {
        &config.generation.scopes
    } else {
        &args.scopes
    };
    for scope in scopes {
        request = request.with_scope(scope.clone());
    }

    for (key, value) in &config.generation.parameters {
        request = request.with_runtime_parameter(canonical_parameter(key), value.clone());
    }
    for (key, value) in &args.params {
        request = request.with_runtime_parameter(key.clone(), value.clone());
    }
    for (key, value) in &args.output_params {
        request = request.with_output_parameter(key.clone(), value.clone());
    }
    request
}

/// Settings keys may come back lowercased from the environment; restore the
/// spelling of the well-known root parameters.
fn canonical_parameter(key: &str) -> String {
    [COMPANY_PARAMETER, APP_NAME_PARAMETER]
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(key))
        .unwrap_or(key)
        .to_string()
}

/// A script given as a file lets its siblings be inherited by id.
fn script_directories(script: &str) -> Vec<PathBuf> {
    let path = Path::new(script);
    match path.parent() {
        Some(parent) if path.is_file() && !parent.as_os_str().is_empty() => {
            vec![parent.to_path_buf()]
        }
        _ => Vec::new(),
    }
}

fn check_expectation(args: &GenerateArgs, stats: &GenerationStatistics) -> CliResult<()> {
    if args.expect_no_changes && !stats.is_unchanged() {
        return Err(CliError::ChangesDetected {
            changed: stats.changed(),
        });
    }
    Ok(())
}
