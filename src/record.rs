//! Streamed records - one paragraph of one document.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of the document a record belongs to.
///
/// Sources emit ids as JSON numbers or strings; both normalise to the same
/// textual form so `42` and `"42"` land in the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(DocumentId(s)),
            serde_json::Value::Number(n) => {
                if let Some(id) = n.as_u64() {
                    return Ok(DocumentId(id.to_string()));
                }
                if let Some(id) = n.as_i64() {
                    return Ok(DocumentId(id.to_string()));
                }
                // Integral floats (`7.0`) name the same document as `7`
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                        Ok(DocumentId((f as i64).to_string()))
                    }
                    _ => Err(de::Error::custom(format!(
                        "document id must be an integer or a string, got {}",
                        n
                    ))),
                }
            }
            other => Err(de::Error::custom(format!(
                "document id must be an integer or a string, got {}",
                other
            ))),
        }
    }
}

/// One row of the source dataset.
///
/// Only the fields the ingest loop needs are kept; anything else in the row
/// (title, url, views, ...) is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: DocumentId,
    pub paragraph_id: u64,
    pub text: String,
    pub emb: Vec<f32>,
}
