//! Output management and formatting.

use std::{
    io::{self, IsTerminal},
    time::Duration,
};

use console::Term;
use entigen_core::application::{ArtifactStatus, GenerationStatistics};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }
    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Machine-readable payload; written even in quiet mode.
    pub fn json(&self, value: &serde_json::Value) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Spinner on stderr while a long step runs; hidden unless output is human.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || self.resolved_format != OutputFormat::Human {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(msg.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    /// Report a finished generation run in the resolved format.
    pub fn statistics(&self, stats: &GenerationStatistics, simulate: bool) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            return self.json(&serde_json::json!({
                "simulate": simulate,
                "statistics": stats,
            }));
        }

        for warning in &stats.warnings {
            self.warning(warning)?;
        }

        let changed: Vec<_> = stats
            .artifacts
            .iter()
            .filter(|a| a.status != ArtifactStatus::NotChanged)
            .collect();
        if !changed.is_empty() {
            self.header(if simulate {
                "Would write:"
            } else {
                "Written:"
            })?;
            for artifact in changed {
                let status = format!("{:<9}", artifact.status.to_string());
                let status = match (self.no_color, artifact.status) {
                    (true, _) => status,
                    (false, ArtifactStatus::Created) => status.green().to_string(),
                    (false, _) => status.yellow().to_string(),
                };
                self.print(&format!(
                    "  {status} {} ({} lines)",
                    artifact.path.display(),
                    artifact.lines
                ))?;
            }
        }

        let line = summary_line(stats, simulate);
        if simulate {
            self.info(&line)
        } else {
            self.success(&line)
        }
    }
}

/// One-line totals, e.g. `2 created, 1 updated, 5 unchanged (120 lines) in 14ms`.
fn summary_line(stats: &GenerationStatistics, simulate: bool) -> String {
    let counts = format!(
        "{} created, {} updated, {} unchanged",
        stats.created, stats.updated, stats.not_changed
    );
    if simulate {
        format!("Simulation: {counts}, nothing written")
    } else {
        format!(
            "{counts} ({} lines) in {}ms",
            stats.total_lines,
            stats.elapsed.as_millis()
        )
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
