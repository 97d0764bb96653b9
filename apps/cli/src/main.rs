// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MEP-Systems CLI - prints the systems tree of a model snapshot.
//!
//! Usage:
//!   mep-systems <model.json> [--format outline|json] [--config <config.json>]
//!               [--isolate <node path>]
//!
//! Environment:
//!   SYSTEMS_MODEL   model snapshot used when no path is given
//!   SYSTEMS_CONFIG  attribute/category overrides (JSON)
//!   SYSTEMS_FORMAT  default output format
//!   RUST_LOG        log filter (default: info,mep_systems=debug)

use anyhow::Context;
use mep_systems::{load_systems_tree, SystemsTreeDelegate};
use mep_systems_core::MemoryModel;

mod config;
mod output;

use config::{Config, OutputFormat};
use output::{render_outline, ConsoleViewport};

const USAGE: &str = "\
Usage: mep-systems <model.json> [options]

Options:
  --format <outline|json>  Output format (default: outline)
  --config <file>          JSON overrides for attribute names and categories
  --isolate <path>         Isolate the node at this path, e.g. systems/Mechanical
  -h, --help               Show this help";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,mep_systems=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %format!("{:#}", err), "Systems tree failed to populate");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let Some(config) = Config::from_env().with_args(std::env::args().skip(1))? else {
        println!("{}", USAGE);
        return Ok(());
    };
    let model_path = config
        .model_path
        .clone()
        .context("no model snapshot given (pass a path or set SYSTEMS_MODEL)")?;
    let systems_config = config.systems_config().await?;

    tracing::info!(
        model = %model_path.display(),
        format = ?config.format,
        "Loading model snapshot"
    );
    let json = tokio::fs::read_to_string(&model_path)
        .await
        .with_context(|| format!("cannot read model '{}'", model_path.display()))?;
    let model = MemoryModel::from_json(&json)
        .with_context(|| format!("model '{}' did not load", model_path.display()))?;

    let root = load_systems_tree(&model, &systems_config).await?;
    let mut delegate = SystemsTreeDelegate::new(ConsoleViewport::default());

    match config.format {
        OutputFormat::Outline => println!("{}", render_outline(&delegate, &root)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&root)?),
    }

    if let Some(path) = &config.isolate {
        if !delegate.click_path(&root, path) {
            anyhow::bail!("no systems node at '{}'", path);
        }
        println!("isolated: {}", delegate.viewport().summary());
    }
    Ok(())
}
