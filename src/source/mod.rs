//! Record sources
//!
//! A source is an iterator of `Result<Record>`. The ingest loop pulls from
//! it lazily, so a hub source only fetches the pages actually consumed.
//!
//! - [`HubSource`] - HuggingFace datasets-server `/rows` API
//! - [`JsonlSource`] - local JSON Lines file, one record per line

mod hub;
mod jsonl;

pub use hub::{HubSource, RowsPage, DEFAULT_ENDPOINT, MAX_PAGE_SIZE};
pub use jsonl::JsonlSource;

use crate::record::Record;
use anyhow::Result;

/// Anything that yields records in stream order.
pub trait RecordSource: Iterator<Item = Result<Record>> {
    /// Short description for progress output.
    fn describe(&self) -> String;
}
