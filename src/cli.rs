//! Command-line front end: normalize one JSON document and print the result.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use crate::{Error, Normalizer, NormalizerConfig, Output, Value};

#[derive(Debug, Parser)]
#[command(
    name = "mapnorm",
    about = "Normalize JSON documents into plain, log-friendly mappings"
)]
pub struct Cli {
    /// JSON document to normalize. Reads stdin when omitted or `-`.
    pub input: Option<PathBuf>,

    /// Options file (TOML, YAML or JSON). `MAPNORM_*` environment variables
    /// are layered on top.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Drop this top-level key from the output. Repeatable.
    #[arg(long = "ignore", value_name = "KEY")]
    pub ignore: Vec<String>,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,

    /// Log to stderr (filter with RUST_LOG, default `debug`).
    #[arg(long)]
    pub debug: bool,
}

/// Run the CLI and return the rendered JSON.
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    let document = read_document(cli.input.as_deref())?;

    let output = match normalize_document(cli, document) {
        Ok(output) => output,
        Err(err @ Error::Config(_)) => {
            let path = cli.config.as_deref().unwrap_or(Path::new("-"));
            return Err(anyhow::Error::new(err)
                .context(format!("loading options from {}", path.display())));
        }
        Err(err) => return Err(err.into()),
    };
    tracing::debug!(keys = output.len(), "normalized document");

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(rendered)
}

fn normalize_document(cli: &Cli, document: serde_json::Value) -> crate::Result<Output> {
    let config = match &cli.config {
        Some(path) => NormalizerConfig::load(path)?,
        None => NormalizerConfig::default(),
    };
    let output = Normalizer::new(config).normalize_with_ignored(&Value::from(document), &cli.ignore)?;
    Ok(output)
}

fn read_document(input: Option<&Path>) -> anyhow::Result<serde_json::Value> {
    let text = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("input is not valid JSON")
}
