// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
//
//! smartmix_evaluate — CLI binary for one full mix evaluation
//!
//! Loads the scaler, model, lab table and optional config once, reads a JSON
//! mix on stdin or as --json, and prints the MixReport as JSON.
//!
//! Usage:
//!   echo '{"cement":350,"sf":0,"fa":0,"wc":0.45,"nca":1100,"nfa":700,"rca_p":0,"mrca_p":0,"sp":2,"fiber":0}' \
//!     | smartmix_evaluate --scaler scaler.json --model model.json --table lab_mixes.csv
//!   smartmix_evaluate --scaler ... --model ... --table ... --json '{"cement":350,...}' --pretty
//!
//! Logs go to stderr (`RUST_LOG=debug` for per-stage detail); stdout carries
//! only the report.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use smartmix_core::mix_kernel::{AssetPaths, MixKernel};

/// Evaluate a concrete mix design.
#[derive(Parser)]
#[command(name = "smartmix_evaluate", about = "Predict strength, CO2, cost and sustainability rank of a mix")]
struct Args {
    /// Feature scaler artifact (JSON).
    #[arg(long)]
    scaler: PathBuf,

    /// Strength model artifact (JSON).
    #[arg(long)]
    model: PathBuf,

    /// Reference lab-mix table (semicolon or comma delimited).
    #[arg(long)]
    table: PathBuf,

    /// Evaluator config (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mix as a JSON object. Read from stdin when omitted.
    #[arg(long)]
    json: Option<String>,

    /// Pretty-print the report.
    #[arg(long)]
    pretty: bool,
}

fn read_input(json: Option<String>) -> Result<String> {
    match json {
        Some(json) => Ok(json),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read mix JSON from stdin")?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let paths = AssetPaths {
        scaler: args.scaler,
        model: args.model,
        table: args.table,
        config: args.config,
    };
    let kernel = MixKernel::load(&paths).context("failed to load evaluation assets")?;

    let input = read_input(args.json)?;
    let report = kernel.assess_json(&input).context("mix rejected")?;
    info!(
        strength = report.prediction.strength,
        rank = %report.sustainability.rank,
        "evaluation complete"
    );

    let out = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", out);
    Ok(())
}
