//! HuggingFace datasets-server source.
//!
//! Pages through `GET {endpoint}/rows?dataset=..&config=..&split=..&offset=..&length=..`
//! with blocking reqwest. Each response looks like:
//!
//! ```json
//! {"rows": [{"row_idx": 0, "row": {"id": 0, "paragraph_id": 0, ...}}], "num_rows_total": 485859}
//! ```

use super::RecordSource;
use crate::config::SourceSection;
use crate::log::log_debug;
use crate::record::Record;
use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::Duration;

/// Public datasets-server endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://datasets-server.huggingface.co";

/// Largest `length` the `/rows` API accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// One `/rows` response.
#[derive(Debug, Deserialize)]
pub struct RowsPage {
    pub rows: Vec<RowEntry>,
    #[serde(default)]
    pub num_rows_total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RowEntry {
    pub row_idx: u64,
    pub row: serde_json::Value,
}

impl RowsPage {
    /// Parse a response body.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).context("Failed to parse /rows response")
    }

    /// Decode every row into a [`Record`], naming the row on failure.
    pub fn into_records(self) -> Result<Vec<Record>> {
        self.rows
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry.row)
                    .with_context(|| format!("Row {} is not a valid record", entry.row_idx))
            })
            .collect()
    }
}

/// Lazily paginated dataset rows.
pub struct HubSource {
    client: reqwest::blocking::Client,
    endpoint: String,
    dataset: String,
    config: String,
    split: String,
    page_size: usize,
    offset: u64,
    total: Option<u64>,
    buffer: VecDeque<Record>,
    exhausted: bool,
}

impl HubSource {
    pub fn from_config(source: &SourceSection) -> Result<Self> {
        if source.page_size == 0 || source.page_size > MAX_PAGE_SIZE {
            bail!(
                "page_size must be between 1 and {} (got {})",
                MAX_PAGE_SIZE,
                source.page_size
            );
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            endpoint: source.endpoint.trim_end_matches('/').to_string(),
            dataset: source.dataset.clone(),
            config: source.config.clone(),
            split: source.split.clone(),
            page_size: source.page_size,
            offset: 0,
            total: None,
            buffer: VecDeque::new(),
            exhausted: false,
        })
    }

    /// URL of the page starting at `offset`.
    pub fn page_url(&self, offset: u64) -> Result<Url> {
        let base = format!("{}/rows", self.endpoint);
        Url::parse_with_params(
            &base,
            &[
                ("dataset", self.dataset.as_str()),
                ("config", self.config.as_str()),
                ("split", self.split.as_str()),
                ("offset", offset.to_string().as_str()),
                ("length", self.page_size.to_string().as_str()),
            ],
        )
        .with_context(|| format!("Invalid endpoint: {}", self.endpoint))
    }

    fn fetch_page(&mut self) -> Result<()> {
        let url = self.page_url(self.offset)?;
        log_debug("source::hub", &format!("GET {}", url));

        let response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("Failed to GET {}", url))?;

        if !response.status().is_success() {
            bail!("HTTP {}: {}", response.status(), url);
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response body from {}", url))?;
        let page = RowsPage::parse(&body)?;
        self.apply_page(page)
    }

    /// Buffer a fetched page and advance pagination state.
    fn apply_page(&mut self, page: RowsPage) -> Result<()> {
        if let Some(total) = page.num_rows_total {
            self.total = Some(total);
        }

        let records = page.into_records()?;
        if records.is_empty() {
            self.exhausted = true;
            return Ok(());
        }

        self.offset += records.len() as u64;
        if matches!(self.total, Some(total) if self.offset >= total) {
            self.exhausted = true;
        }
        self.buffer.extend(records);
        Ok(())
    }
}

impl Iterator for HubSource {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.buffer.pop_front() {
            return Some(Ok(record));
        }
        if self.exhausted {
            return None;
        }

        if let Err(e) = self.fetch_page() {
            self.exhausted = true;
            return Some(Err(e));
        }
        self.buffer.pop_front().map(Ok)
    }
}

impl RecordSource for HubSource {
    fn describe(&self) -> String {
        format!("{} [{}/{}]", self.dataset, self.config, self.split)
    }
}
