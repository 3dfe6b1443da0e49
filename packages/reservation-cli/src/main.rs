//! CLI for the reservation engine
//!
//! Reads extraction and catalog JSON from files, runs the engine and prints
//! JSON to stdout. Logs go to stderr.

mod config;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use reservation_engine::{
    assemble_reservation, diff_passengers, diff_stored, parse_extraction, rank_candidates,
    resolve_match, score_breakdown, Assembly, CandidateRow, EditPlan, EntityKind,
    MatchSelection, RejectedEntity, Reservation, ScoreBreakdown,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "reservation")]
#[command(about = "Normalize, match and diff extracted reservations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a canonical reservation from raw extraction JSON
    Normalize {
        raw: PathBuf,
        /// Date used for defaults (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Score catalog rows against a target row
    Match {
        /// hotel, servicio or programa
        #[arg(long)]
        kind: EntityKind,
        #[arg(long)]
        target: PathBuf,
        /// JSON array of rows
        #[arg(long)]
        candidates: PathBuf,
    },

    /// Compare a raw extraction with a stored canonical reservation
    Diff {
        raw: PathBuf,
        #[arg(long)]
        old: Option<PathBuf>,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct RankedCandidate {
    index: usize,
    #[serde(flatten)]
    breakdown: ScoreBreakdown,
}

#[derive(Serialize)]
struct MatchResponse {
    kind: EntityKind,
    threshold: f64,
    ranking: Vec<RankedCandidate>,
    selection: Option<MatchSelection>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiffResponse {
    reservation: Reservation,
    #[serde(flatten)]
    plan: EditPlan,
    rejected: Vec<RejectedEntity>,
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reservation_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Normalize { raw, today } => cmd_normalize(&config, &raw, today),
        Commands::Match {
            kind,
            target,
            candidates,
        } => cmd_match(&config, kind, &target, &candidates),
        Commands::Diff { raw, old, today } => cmd_diff(&config, &raw, old.as_deref(), today),
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn assemble_file(config: &Config, path: &Path, today: Option<NaiveDate>) -> Result<Assembly> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let raw = parse_extraction(&text)
        .with_context(|| format!("{} is not an extraction object", path.display()))?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let assembly = assemble_reservation(&raw, &config.engine.assembly, today);
    if assembly.has_rejections() {
        tracing::info!(
            rejected = assembly.rejected.len(),
            "Some extracted entities were incomplete and dropped"
        );
    }
    Ok(assembly)
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_normalize(config: &Config, raw: &Path, today: Option<NaiveDate>) -> Result<()> {
    let assembly = assemble_file(config, raw, today)?;
    output(&assembly)
}

fn cmd_match(config: &Config, kind: EntityKind, target: &Path, candidates: &Path) -> Result<()> {
    let target = CandidateRow::from_json(&read_json(target)?);

    let rows: Vec<CandidateRow> = match read_json(candidates)? {
        Value::Array(items) => items.iter().map(CandidateRow::from_json).collect(),
        _ => anyhow::bail!("{} must hold a JSON array of rows", candidates.display()),
    };

    let ranking = rank_candidates(&rows, &target, kind)
        .into_iter()
        .map(|ranked| RankedCandidate {
            index: ranked.index,
            breakdown: score_breakdown(&rows[ranked.index], &target, kind),
        })
        .collect();

    let selection = resolve_match(&rows, &target, kind, &config.engine.matcher);

    output(&MatchResponse {
        kind,
        threshold: config.engine.matcher.threshold,
        ranking,
        selection,
    })
}

fn cmd_diff(
    config: &Config,
    raw: &Path,
    old: Option<&Path>,
    today: Option<NaiveDate>,
) -> Result<()> {
    let assembly = assemble_file(config, raw, today)?;
    let stored = old.map(read_json).transpose()?;

    let changes = diff_stored(&assembly.reservation, stored.as_ref());
    let previous = stored
        .as_ref()
        .and_then(|value| Reservation::deserialize(value).ok())
        .map(|reservation| reservation.passengers)
        .unwrap_or_default();
    let passengers = diff_passengers(&assembly.reservation.passengers, &previous);

    output(&DiffResponse {
        reservation: assembly.reservation,
        plan: EditPlan {
            changes,
            passengers,
        },
        rejected: assembly.rejected,
    })
}
