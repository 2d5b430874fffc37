//! Ingest configuration
//!
//! Handles `embed-ingest.toml`. Every section and key is optional; defaults
//! reproduce a plain run against the Cohere simple-wikipedia embeddings.

use crate::paths;
use crate::source::{DEFAULT_ENDPOINT, MAX_PAGE_SIZE};
use crate::store::MergeMode;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Config Types
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Stop after this many records
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// How paragraphs combine with existing files
    #[serde(default)]
    pub mode: MergeMode,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub output: OutputSection,
}

/// Default iteration cap.
pub const DEFAULT_LIMIT: usize = 100_000;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            mode: MergeMode::default(),
            source: SourceSection::default(),
            output: OutputSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Dataset repo on the hub
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Dataset config (subset) name
    #[serde(default = "default_config")]
    pub config: String,
    #[serde(default = "default_split")]
    pub split: String,
    /// datasets-server base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Rows per request (1..=100)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Local JSONL file; when set the hub is not contacted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
}

fn default_dataset() -> String {
    "Cohere/wikipedia-22-12-simple-embeddings".to_string()
}
fn default_config() -> String {
    "default".to_string()
}
fn default_split() -> String {
    "train".to_string()
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            config: default_config(),
            split: default_split(),
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            input: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory that receives `<id>.json` files
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_OUTPUT_DIR)
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

impl IngestConfig {
    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config: {:?}", path))
    }

    /// Load `path` if given, else `./embed-ingest.toml` if present, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(paths::DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reject values that would fail later in a less obvious way.
    pub fn validate(&self) -> Result<()> {
        if self.source.input.is_none() {
            if self.source.dataset.trim().is_empty() {
                bail!("source.dataset must not be empty");
            }
            if self.source.split.trim().is_empty() {
                bail!("source.split must not be empty");
            }
            if self.source.page_size == 0 || self.source.page_size > MAX_PAGE_SIZE {
                bail!(
                    "source.page_size must be between 1 and {} (got {})",
                    MAX_PAGE_SIZE,
                    self.source.page_size
                );
            }
        }
        if self.output.dir.as_os_str().is_empty() {
            bail!("output.dir must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.limit, 100_000);
        assert_eq!(config.mode, MergeMode::Accumulate);
        assert_eq!(config.source.dataset, "Cohere/wikipedia-22-12-simple-embeddings");
        assert_eq!(config.source.split, "train");
        assert_eq!(config.source.page_size, 100);
        assert_eq!(config.output.dir, PathBuf::from("dataset"));
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = IngestConfig::from_toml("").unwrap();
        assert_eq!(config.limit, DEFAULT_LIMIT);
        assert_eq!(config.source.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_partial_toml() {
        let config = IngestConfig::from_toml(
            r#"
limit = 500
mode = "replace"

[source]
split = "validation"
page_size = 25

[output]
dir = "out/docs"
"#,
        )
        .unwrap();

        assert_eq!(config.limit, 500);
        assert_eq!(config.mode, MergeMode::Replace);
        assert_eq!(config.source.split, "validation");
        assert_eq!(config.source.page_size, 25);
        assert_eq!(config.source.config, "default");
        assert_eq!(config.output.dir, PathBuf::from("out/docs"));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(IngestConfig::from_toml(r#"mode = "append""#).is_err());
    }

    #[test]
    fn test_validate() {
        let mut config = IngestConfig::default();
        config.source.page_size = 0;
        assert!(config.validate().is_err());

        // Hub settings don't matter for a local input
        config.source.input = Some(PathBuf::from("rows.jsonl"));
        config.validate().unwrap();

        config.output.dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("embed-ingest.toml");
        fs::write(&path, "limit = 3\n[source]\ninput = \"rows.jsonl\"\n").unwrap();

        let config = IngestConfig::resolve(Some(path.as_path())).unwrap();
        assert_eq!(config.limit, 3);
        assert_eq!(config.source.input, Some(PathBuf::from("rows.jsonl")));

        assert!(IngestConfig::load(&tmp.path().join("missing.toml")).is_err());
    }
}
