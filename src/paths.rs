//! Single source of truth for the output filesystem layout.
//!
//! This module defines WHERE documents live. Apart from validating ids it
//! has no I/O and no business logic.
//!
//! ```text
//! <output_dir>/
//! ├── 0.json       # {"chunks": {...}} for document id 0
//! ├── 1.json
//! └── ...
//! ```

use crate::record::DocumentId;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "dataset";

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "embed-ingest.toml";

/// File extension for persisted documents.
pub const DOCUMENT_EXT: &str = "json";

/// Path of the document file for `id` inside `dir`: `dir/<id>.json`
///
/// Rejects ids that would escape `dir` or name no file at all.
pub fn document_path(dir: &Path, id: &DocumentId) -> Result<PathBuf> {
    validate_id(id)?;
    Ok(dir.join(format!("{}.{}", id.as_str(), DOCUMENT_EXT)))
}

fn validate_id(id: &DocumentId) -> Result<()> {
    let raw = id.as_str();
    if raw.is_empty() {
        bail!("Document id is empty");
    }
    if raw == "." || raw == ".." {
        bail!("Document id '{}' is not a valid file name", raw);
    }
    if raw.contains(['/', '\\', '\0']) {
        bail!("Document id '{}' contains a path separator", raw);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_path() {
        let path = document_path(Path::new("out"), &DocumentId::from(42)).unwrap();
        assert_eq!(path, PathBuf::from("out/42.json"));
    }

    #[test]
    fn test_document_path_rejects_escapes() {
        let dir = Path::new("out");
        for bad in ["", ".", "..", "../etc", "a/b", "a\\b", "nul\0"] {
            assert!(
                document_path(dir, &DocumentId::from(bad)).is_err(),
                "id {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_dotted_ids_are_fine() {
        let path = document_path(Path::new("out"), &DocumentId::from("v1.2")).unwrap();
        assert_eq!(path, PathBuf::from("out/v1.2.json"));
    }
}
