//! Cloze restore command line
//!
//! - `relink <bundle.json>` runs creation, correction and attempt
//!   recoding over a JSON restore bundle
//! - `sequence <raw> --map old=new` recodes one stored sequence

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cloze_codec::{RecordId, Sequence};
use cloze_mapping::{MappingTable, Namespace};
use cloze_restore::{ItemOutcome, RestoreBundle, RestoreConfig, RunReport};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "cloze-restore", version, about = "Relink composite cloze questions after a restore")]
pub struct Cli {
    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a full restore bundle
    Relink(RelinkArgs),
    /// Recode one sequence string
    Sequence(SequenceArgs),
}

/// `relink` arguments
#[derive(Debug, Parser)]
pub struct RelinkArgs {
    /// Restore bundle JSON path
    #[arg(value_name = "BUNDLE")]
    pub bundle: PathBuf,
    /// Restore config TOML path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Output the full report as JSON
    #[arg(long)]
    pub json: bool,
}

/// `sequence` arguments
#[derive(Debug, Parser)]
pub struct SequenceArgs {
    /// Stored sequence, e.g. `5,7,9`
    #[arg(value_name = "RAW")]
    pub raw: String,
    /// Child id mapping, repeatable
    #[arg(long = "map", value_name = "OLD=NEW", value_parser = parse_mapping)]
    pub mappings: Vec<(RecordId, RecordId)>,
    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_mapping(text: &str) -> Result<(RecordId, RecordId)> {
    let Some((old, new)) = text.split_once('=') else {
        bail!("expected OLD=NEW, got '{text}'");
    };
    let old = old.parse().with_context(|| format!("invalid old id in '{text}'"))?;
    let new = new.parse().with_context(|| format!("invalid new id in '{text}'"))?;
    Ok((old, new))
}

/// Result of the `sequence` subcommand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceReport {
    /// Recoded sequence
    pub sequence: String,
    /// Tokens with no mapping
    pub unresolved: Vec<String>,
    /// Whether the input had no empty tokens
    pub consistent: bool,
}

/// Run a command, returning what to print on stdout
///
/// # Errors
/// Any loading or batch-fatal restore error
pub fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Commands::Relink(args) => relink(&args),
        Commands::Sequence(args) => sequence(&args),
    }
}

fn relink(args: &RelinkArgs) -> Result<String> {
    let config = match &args.config {
        Some(path) => RestoreConfig::load(path)?,
        None => RestoreConfig::default(),
    };
    let bundle = RestoreBundle::load(&args.bundle)?;
    tracing::info!(
        bundle = %args.bundle.display(),
        composites = bundle.composites.len(),
        attempts = bundle.attempts.len(),
        "running restore bundle"
    );

    let report = bundle.run(config).context("restore aborted")?;
    if args.json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    render_report(&report)
}

fn render_report(report: &RunReport) -> Result<String> {
    let mut out = String::new();
    write_report(&mut out, report)?;
    Ok(out)
}

fn write_report(out: &mut impl fmt::Write, report: &RunReport) -> fmt::Result {
    let created = report.created.iter().flatten().count();
    let correction = &report.correction;

    writeln!(out, "composites created: {created} of {}", report.created.len())?;
    writeln!(
        out,
        "composites corrected: {} ({} rewritten, {} unresolved children)",
        correction.composites, correction.rewritten, correction.unresolved
    )?;
    if !correction.suppressed_shuffles.is_empty() {
        let ids: Vec<_> = correction.suppressed_shuffles.iter().map(ToString::to_string).collect();
        writeln!(out, "shuffling switched off: {}", ids.join(", "))?;
    }
    for warning in &correction.warnings {
        writeln!(out, "warning: {warning}")?;
    }

    writeln!(
        out,
        "attempts: {} recoded, {} failed",
        report.attempts.succeeded(),
        report.attempts.failed()
    )?;
    for outcome in &report.attempts.outcomes {
        match outcome {
            ItemOutcome::Legacy { outcome, .. } => {
                for warning in &outcome.warnings {
                    writeln!(out, "warning: {warning}")?;
                }
                for skipped in &outcome.skipped {
                    writeln!(out, "skipped: {skipped}")?;
                }
            }
            ItemOutcome::Failed { question, error } => {
                writeln!(out, "failed: question {question}: {error}")?;
            }
            ItemOutcome::Response { .. } => {}
        }
    }
    Ok(())
}

fn sequence(args: &SequenceArgs) -> Result<String> {
    let namespace = Namespace::question();
    let mapping = MappingTable::new();
    for (old, new) in &args.mappings {
        mapping.set_mapping(&namespace, *old, *new)?;
    }
    mapping.freeze();

    let parsed = Sequence::parse(&args.raw);
    let resolution = parsed.resolve(|token| mapping.resolve_token(&namespace, token));
    if !parsed.is_consistent() {
        tracing::warn!(
            raw = parsed.raw_token_count(),
            parsed = parsed.len(),
            "sequence contains empty tokens"
        );
    }

    let report = SequenceReport {
        sequence: resolution.sequence.serialize(),
        unresolved: resolution.unresolved,
        consistent: parsed.is_consistent(),
    };
    if args.json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    Ok(report.sequence)
}
