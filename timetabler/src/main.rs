/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use timetabler::config;
use timetabler::report::{render_text, TimetableResult};
use timetabler::scheduler::{check_references, TimetableGenerator};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Output encoding for the generated timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Weekly timetable generator.
///
/// Example:
///   timetabler --snapshot demos/sample_snapshot.yaml --seed 42 --format table
#[derive(Debug, Parser)]
#[command(
    name = "timetabler",
    about = "Generate a weekly class timetable from a YAML snapshot",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML snapshot (courses, classes, faculties, classrooms, lessons).
    #[arg(short = 's', long = "snapshot")]
    snapshot: PathBuf,

    /// Fixed random seed; omit for a time-based seed.
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Output format written to stdout.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Refuse to generate when a lesson references a missing course, faculty or class.
    #[arg(long = "strict", default_value_t = false)]
    strict: bool,
}

fn render(result: &TimetableResult, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Yaml => serde_yaml::to_string(result)?,
        OutputFormat::Table => render_text(result),
    })
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    // Logs go to stderr so stdout carries only the timetable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!(
        snapshot = ?cli.snapshot,
        seed     = ?cli.seed,
        format   = ?cli.format,
        strict   = cli.strict,
        "Configuration"
    );

    // ── Load snapshot ─────────────────────────────────────────────────────────
    let input = match config::load_from_file(&cli.snapshot) {
        Ok(input) => input,
        Err(e) => {
            error!("Failed to load snapshot: {:#}", e);
            process::exit(1);
        }
    };

    // ── Reference checks ──────────────────────────────────────────────────────
    let problems = check_references(&input.snapshot);
    for problem in &problems {
        warn!("{}", problem);
    }
    if cli.strict && !problems.is_empty() {
        error!(
            count = problems.len(),
            "Unresolvable lesson references (strict mode)"
        );
        process::exit(1);
    }

    // ── Generate ──────────────────────────────────────────────────────────────
    let mut generator = TimetableGenerator::new(input.grid);
    if let Some(seed) = cli.seed {
        generator = generator.with_seed(seed);
    }
    let result = generator.generate(&input.snapshot);

    match render(&result, cli.format) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            error!("Failed to render timetable: {:#}", e);
            process::exit(1);
        }
    }
}
