//! Persisted document format.
//!
//! ```json
//! {"chunks": {"0": {"text": "...", "embedding": [0.1, ...]}, "1": {...}}}
//! ```

use crate::record::Record;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One paragraph's text and embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

impl From<&Record> for Chunk {
    fn from(record: &Record) -> Self {
        Self {
            text: record.text.clone(),
            embedding: record.emb.clone(),
        }
    }
}

/// All chunks seen so far for one document id, keyed by paragraph id.
///
/// JSON object keys are strings on disk; `BTreeMap<u64, _>` keeps them in
/// numeric order when written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub chunks: BTreeMap<u64, Chunk>,
}

impl Document {
    /// A document holding just this record's paragraph.
    pub fn from_record(record: &Record) -> Self {
        let mut doc = Self::default();
        doc.upsert(record);
        doc
    }

    /// Insert the record's paragraph, overwriting any chunk with the same id.
    ///
    /// Returns the chunk that was replaced, if any.
    pub fn upsert(&mut self, record: &Record) -> Option<Chunk> {
        self.chunks.insert(record.paragraph_id, Chunk::from(record))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn get(&self, paragraph_id: u64) -> Option<&Chunk> {
        self.chunks.get(&paragraph_id)
    }

    /// Parse a document from its on-disk JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse document JSON")
    }

    /// Serialize to the on-disk JSON form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize document")
    }
}
