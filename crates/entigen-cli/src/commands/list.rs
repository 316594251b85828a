//! Implementation of the `entigen list` command.

use crate::{
    cli::{ListArgs, ListFormat, ListTarget},
    commands::build_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = build_service(&config, args.templates.as_deref(), &[])?;

    let names = match args.what {
        ListTarget::Generators => service.list_generators(),
        ListTarget::Editors => service.list_editors(),
        ListTarget::Templates => service.list_templates()?,
        ListTarget::Scripts => service.list_scripts(),
    };

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Available {}:", args.what))?;
            for name in &names {
                output.print(&format!("  {name}"))?;
            }
        }
        // JSON goes out even in quiet mode so pipes stay parseable.
        ListFormat::Json => output.json(&serde_json::json!(names))?,
        ListFormat::List => {
            for name in &names {
                output.print(name)?;
            }
        }
    }

    Ok(())
}
