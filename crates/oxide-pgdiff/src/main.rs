//! oxide-pgdiff CLI
//!
//! Command-line tool that diffs two catalog dumps and prints the DDL script.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_pgdiff::prelude::*;

/// Diff two PostgreSQL catalog dumps into a DDL script.
#[derive(Parser)]
#[command(name = "oxide-pgdiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog dump describing the current state.
    #[arg(short, long, env = "PGDIFF_SOURCE")]
    source: PathBuf,

    /// Catalog dump describing the desired state.
    #[arg(short, long, env = "PGDIFF_TARGET")]
    target: PathBuf,

    /// Write the script to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Object kinds to diff (all if not specified).
    #[arg(short, long, value_enum, value_delimiter = ',')]
    kinds: Vec<ObjectKind>,

    /// Do not emit COMMENT statements.
    #[arg(long)]
    no_comment: bool,

    /// Do not emit OWNER TO statements.
    #[arg(long)]
    no_owner: bool,

    /// Do not emit GRANT / REVOKE statements.
    #[arg(long)]
    no_privileges: bool,

    /// Do not emit option list changes.
    #[arg(long)]
    no_options: bool,

    /// Emit one OPTIONS statement per DROP / SET / ADD group.
    #[arg(long)]
    separate_option_statements: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> DiffConfig {
        let clauses = if self.separate_option_statements {
            OptionClauses::Separate
        } else {
            OptionClauses::Combined
        };
        DiffConfig::new()
            .with_comments(!self.no_comment)
            .with_owner(!self.no_owner)
            .with_privileges(!self.no_privileges)
            .with_options(!self.no_options)
            .option_clauses(clauses)
    }

    fn kinds(&self) -> Vec<ObjectKind> {
        if self.kinds.is_empty() {
            ObjectKind::ALL.to_vec()
        } else {
            self.kinds.clone()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the script.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let source = JsonCatalog::load(&cli.source)
        .with_context(|| format!("failed to load source catalog {}", cli.source.display()))?;
    let target = JsonCatalog::load(&cli.target)
        .with_context(|| format!("failed to load target catalog {}", cli.target.display()))?;

    let config = cli.config();
    let ctx = DiffContext::new(&config);
    let kinds = cli.kinds();

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut writer = DdlWriter::new(sink);

    let report = diff_catalogs(&source, &target, &ctx, &kinds, &mut writer)?;
    if let Some(path) = &cli.output {
        info!("Wrote {} statements to {}", report.statements(), path.display());
    }

    report
        .into_result()
        .context("some objects could not be diffed; the script is incomplete")?;

    Ok(())
}
