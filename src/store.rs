//! Per-document JSON files: load, merge, write.

use crate::document::Document;
use crate::log::log_debug;
use crate::paths;
use crate::record::{DocumentId, Record};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// How a new paragraph combines with what is already on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Read the existing document and add the paragraph to it.
    #[default]
    Accumulate,
    /// Never read; each write leaves only the latest paragraph.
    Replace,
}

/// What an upsert did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// No prior file; a one-chunk document was written.
    Created,
    /// Existing document parsed and the paragraph merged in.
    Merged,
    /// A file existed but was unreadable (or `Replace` mode); it was overwritten.
    Replaced,
}

/// Directory of document files.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    /// Open the store at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding document `id`.
    pub fn path_for(&self, id: &DocumentId) -> Result<PathBuf> {
        paths::document_path(&self.dir, id)
    }

    /// Load document `id`.
    ///
    /// Missing, empty and malformed files all come back as `None`; the
    /// difference only shows up in debug logging.
    pub fn load(&self, id: &DocumentId) -> Result<Option<Document>> {
        let path = self.path_for(id)?;
        Ok(read_document(&path))
    }

    /// Write `doc` as document `id`, replacing whatever was there.
    pub fn save(&self, id: &DocumentId, doc: &Document) -> Result<()> {
        let path = self.path_for(id)?;
        let json = doc.to_json()?;
        write_atomic(&self.dir, &path, |file| Ok(file.write_all(json.as_bytes())?))
    }

    /// Merge `record` into its document and persist the result.
    pub fn upsert(&self, record: &Record, mode: MergeMode) -> Result<Upsert> {
        let path = self.path_for(&record.id)?;

        let (doc, outcome) = match mode {
            MergeMode::Replace => {
                let outcome = if path.exists() {
                    Upsert::Replaced
                } else {
                    Upsert::Created
                };
                (Document::from_record(record), outcome)
            }
            MergeMode::Accumulate => match read_document(&path) {
                Some(mut doc) => {
                    doc.upsert(record);
                    (doc, Upsert::Merged)
                }
                None if path.exists() => (Document::from_record(record), Upsert::Replaced),
                None => (Document::from_record(record), Upsert::Created),
            },
        };

        let json = doc.to_json()?;
        write_atomic(&self.dir, &path, |file| Ok(file.write_all(json.as_bytes())?))?;
        Ok(outcome)
    }
}

/// Write `path` through a temp file in `dir`, renamed over the target once
/// complete. A failed or interrupted write leaves the previous file as it was.
fn write_atomic<F>(dir: &Path, path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;
    write(tmp.as_file_mut()).with_context(|| format!("Failed to write document: {:?}", path))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush document: {:?}", path))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace document: {:?}", path))?;
    Ok(())
}

fn read_document(path: &Path) -> Option<Document> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log_debug("store", &format!("no document at {:?}: {}", path, e));
            return None;
        }
    };

    match Document::from_json(&content) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log_debug("store", &format!("discarding {:?}: {:#}", path, e));
            None
        }
    }
}
