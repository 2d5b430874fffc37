//! The ingestion loop.
//!
//! Pulls records from a source one at a time and upserts each into its
//! document file. Stops after `limit` records or when the source runs dry.

use crate::record::Record;
use crate::store::{DocumentStore, MergeMode, Upsert};
use anyhow::{Context, Result};
use serde::Serialize;

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    LimitReached,
    SourceExhausted,
}

/// Counters for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub processed: usize,
    pub created: usize,
    pub merged: usize,
    pub replaced: usize,
    pub stop: StopReason,
}

impl IngestStats {
    fn new() -> Self {
        Self {
            processed: 0,
            created: 0,
            merged: 0,
            replaced: 0,
            stop: StopReason::SourceExhausted,
        }
    }

    fn record(&mut self, outcome: Upsert) {
        self.processed += 1;
        match outcome {
            Upsert::Created => self.created += 1,
            Upsert::Merged => self.merged += 1,
            Upsert::Replaced => self.replaced += 1,
        }
    }
}

/// Run the loop.
///
/// `on_progress` receives the running count after each record is written.
/// Source errors and write errors end the run; unreadable existing files
/// do not.
pub fn ingest<I, F>(
    records: I,
    store: &DocumentStore,
    mode: MergeMode,
    limit: usize,
    mut on_progress: F,
) -> Result<IngestStats>
where
    I: IntoIterator<Item = Result<Record>>,
    F: FnMut(usize),
{
    let mut stats = IngestStats::new();
    if limit == 0 {
        stats.stop = StopReason::LimitReached;
        return Ok(stats);
    }

    for record in records {
        let record = record
            .with_context(|| format!("Source failed after {} records", stats.processed))?;

        let outcome = store.upsert(&record, mode).with_context(|| {
            format!(
                "Failed to store paragraph {} of document {}",
                record.paragraph_id, record.id
            )
        })?;
        stats.record(outcome);
        on_progress(stats.processed);

        if stats.processed >= limit {
            stats.stop = StopReason::LimitReached;
            break;
        }
    }

    Ok(stats)
}
