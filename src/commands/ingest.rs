//! Ingest command - stream records into per-document JSON files

use anyhow::{Context, Result};
use clap::Args;
use embed_ingest::log::log_debug;
use embed_ingest::source::{HubSource, JsonlSource, RecordSource};
use embed_ingest::{ingest, DocumentStore, IngestConfig, IngestStats, MergeMode, StopReason};
use serde_json::json;
use std::path::PathBuf;

/// Command-line flags. Anything left unset falls back to the config file,
/// then to built-in defaults.
#[derive(Args, Debug, Default)]
pub struct IngestArgs {
    /// Config file (defaults to ./embed-ingest.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset repo on the HuggingFace hub
    #[arg(long)]
    dataset: Option<String>,

    /// Dataset config (subset) name
    #[arg(long = "config-name")]
    config_name: Option<String>,

    /// Dataset split
    #[arg(long)]
    split: Option<String>,

    /// datasets-server base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Rows fetched per request (1-100)
    #[arg(long)]
    page_size: Option<usize>,

    /// Read records from a local JSONL file instead of the hub
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory that receives <id>.json files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop after this many records
    #[arg(short, long)]
    limit: Option<usize>,

    /// Keep only the latest paragraph per document instead of merging
    #[arg(long)]
    replace: bool,

    /// Don't print the running count
    #[arg(short, long)]
    quiet: bool,

    /// Print the final summary as JSON
    #[arg(short, long)]
    json: bool,
}

impl IngestArgs {
    /// Layer flags over a loaded config.
    fn apply(&self, config: &mut IngestConfig) {
        if let Some(dataset) = &self.dataset {
            config.source.dataset = dataset.clone();
        }
        if let Some(name) = &self.config_name {
            config.source.config = name.clone();
        }
        if let Some(split) = &self.split {
            config.source.split = split.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.source.endpoint = endpoint.clone();
        }
        if let Some(page_size) = self.page_size {
            config.source.page_size = page_size;
        }
        if let Some(input) = &self.input {
            config.source.input = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.output.dir = output.clone();
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if self.replace {
            config.mode = MergeMode::Replace;
        }
    }
}

pub fn execute(args: IngestArgs) -> Result<()> {
    let mut config = IngestConfig::resolve(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    log_debug("commands::ingest", &format!("{:?}", config));

    let source: Box<dyn RecordSource> = match &config.source.input {
        Some(path) => Box::new(JsonlSource::open(path)?),
        None => Box::new(HubSource::from_config(&config.source)?),
    };
    let store = DocumentStore::open(&config.output.dir)?;

    if !args.json {
        println!(
            "Ingesting {} -> {} (limit {}, {:?})",
            source.describe(),
            store.dir().display(),
            config.limit,
            config.mode
        );
    }

    let started = chrono::Utc::now();
    let quiet = args.quiet || args.json;
    let stats = ingest(source, &store, config.mode, config.limit, |count| {
        if !quiet {
            println!("{}", count);
        }
    })
    .context("Ingest aborted")?;
    let elapsed = chrono::Utc::now() - started;

    if args.json {
        output_json(&stats, &config, started, elapsed)
    } else {
        output_human(&stats, elapsed);
        Ok(())
    }
}

fn output_json(
    stats: &IngestStats,
    config: &IngestConfig,
    started: chrono::DateTime<chrono::Utc>,
    elapsed: chrono::Duration,
) -> Result<()> {
    let summary = json!({
        "started": started.to_rfc3339(),
        "elapsed_ms": elapsed.num_milliseconds(),
        "output": config.output.dir,
        "mode": config.mode,
        "stats": stats,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn output_human(stats: &IngestStats, elapsed: chrono::Duration) {
    let reason = match stats.stop {
        StopReason::LimitReached => "limit reached",
        StopReason::SourceExhausted => "source exhausted",
    };
    println!(
        "Done: {} records in {:.1}s ({})",
        stats.processed,
        elapsed.num_milliseconds() as f64 / 1000.0,
        reason
    );
    println!(
        "   created: {}  merged: {}  replaced: {}",
        stats.created, stats.merged, stats.replaced
    );
}
