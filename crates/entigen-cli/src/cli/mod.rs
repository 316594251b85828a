//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "entigen",
    bin_name = "entigen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Declarative entity code generation",
    long_about = "Entigen reads an entity configuration document and renders \
                  source artifacts through a generation script, writing only \
                  what changed.",
    after_help = "EXAMPLES:\n\
        \x20 entigen generate --config entities.yaml -p Company=Acme -p AppName=Hr\n\
        \x20 entigen generate -c entities.yaml --expect-no-changes\n\
        \x20 entigen list generators\n\
        \x20 entigen completions bash > /usr/share/bash-completion/completions/entigen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate artifacts from an entity configuration.
    #[command(
        visible_alias = "g",
        about = "Generate artifacts from an entity configuration",
        after_help = "EXAMPLES:\n\
            \x20 entigen generate --config entities.yaml\n\
            \x20 entigen generate -c entities.toml --script ./scripts/Api.yaml -o src\n\
            \x20 entigen generate -c entities.json --scope acme --simulate"
    )]
    Generate(GenerateArgs),

    /// List generators, editors, templates or scripts.
    #[command(
        visible_alias = "ls",
        about = "List available generators, editors, templates or scripts",
        after_help = "EXAMPLES:\n\
            \x20 entigen list generators\n\
            \x20 entigen list templates --templates ./templates\n\
            \x20 entigen list scripts --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 entigen completions bash > ~/.local/share/bash-completion/completions/entigen\n\
            \x20 entigen completions zsh  > ~/.zfunc/_entigen\n\
            \x20 entigen completions fish > ~/.config/fish/completions/entigen.fish"
    )]
    Completions(CompletionsArgs),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `entigen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Entity configuration document (.json, .yaml, .yml or .toml).
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Entity configuration document"
    )]
    pub config: PathBuf,

    /// Script id or path. Defaults to the `generation.script` setting.
    #[arg(
        short = 's',
        long = "script",
        value_name = "ID|FILE",
        help = "Generation script id or file"
    )]
    pub script: Option<String>,

    /// Root directory for generated files.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: current directory)"
    )]
    pub output: Option<PathBuf>,

    /// Runtime parameter, e.g. `Company=Acme`. Repeatable.
    #[arg(
        short = 'p',
        long = "param",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Runtime parameter (repeatable)"
    )]
    pub params: Vec<(String, String)>,

    /// Output parameter handed to templates as `output.<KEY>`. Repeatable.
    #[arg(
        long = "output-param",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        help = "Output parameter (repeatable)"
    )]
    pub output_params: Vec<(String, String)>,

    /// Lookup scope for generators and editors. Repeatable, searched in order.
    #[arg(long = "scope", value_name = "SCOPE", help = "Lookup scope (repeatable)")]
    pub scopes: Vec<String>,

    /// Render and compare without writing anything.
    #[arg(long = "simulate", help = "Report what would change without writing")]
    pub simulate: bool,

    /// Fail with exit code 5 if any artifact would be created or updated.
    #[arg(
        long = "expect-no-changes",
        help = "Simulate and fail if anything would change"
    )]
    pub expect_no_changes: bool,

    /// Directory of `*.hbs` templates layered over the built-in ones.
    #[arg(long = "templates", value_name = "DIR", help = "Templates directory")]
    pub templates: Option<PathBuf>,
}

/// Parse `KEY=VALUE`. The key must be non-empty; the value may be empty.
fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `entigen list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum, help = "What to list")]
    pub what: ListTarget,

    /// Directory of `*.hbs` templates layered over the built-in ones.
    #[arg(long = "templates", value_name = "DIR", help = "Templates directory")]
    pub templates: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Things `entigen list` can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListTarget {
    Generators,
    Editors,
    Templates,
    Scripts,
}

impl std::fmt::Display for ListTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generators => write!(f, "generators"),
            Self::Editors => write!(f, "editors"),
            Self::Templates => write!(f, "templates"),
            Self::Scripts => write!(f, "scripts"),
        }
    }
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `entigen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
