pub mod config;
pub mod document;
pub mod ingest;
pub mod log;
pub mod paths;
pub mod record;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use config::IngestConfig;
pub use document::{Chunk, Document};
pub use ingest::{ingest, IngestStats, StopReason};
pub use record::{DocumentId, Record};
pub use store::{DocumentStore, MergeMode, Upsert};
