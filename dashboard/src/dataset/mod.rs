//! Dataset loader.
//!
//! Retrieves the manifest once and hands out an immutable view. Callers share
//! it behind an `Arc` and pass it explicitly to every transform.
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ URL / File   │────▶│   Parser    │────▶│   Dataset   │
//! │ (raw bytes)  │     │ (auto-enc)  │     │ (immutable) │
//! └──────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! There is no retry and no fallback source: a failed load ends the run.

use serde::Serialize;
use std::path::Path;

use crate::api::logs::{log_info, log_success};
use crate::config::DatasetSource;
use crate::error::{LoadError, LoadResult};
use crate::models::Passenger;
use crate::parser::parse_bytes_auto;

/// Describes where a dataset came from and how it was read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub origin: String,
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// The loaded passenger manifest, in source order.
#[derive(Debug, Clone)]
pub struct Dataset {
    passengers: Vec<Passenger>,
    info: SourceInfo,
}

impl Dataset {
    /// Load from whichever source the configuration names.
    pub async fn load(source: &DatasetSource) -> LoadResult<Self> {
        match source {
            DatasetSource::Url(url) => Self::fetch(url).await,
            DatasetSource::File(path) => Self::read_file(path).await,
        }
    }

    /// Fetch over HTTP with a single GET.
    pub async fn fetch(url: &str) -> LoadResult<Self> {
        log_info(format!("Fetching dataset from {}", url));

        let response = reqwest::get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        log_success(format!("Downloaded {} bytes", bytes.len()));

        Self::from_csv_bytes(&bytes, url)
    }

    /// Read a local copy of the manifest.
    pub async fn read_file(path: &Path) -> LoadResult<Self> {
        log_info(format!("Reading dataset from {}", path.display()));
        let bytes = tokio::fs::read(path).await?;
        Self::from_csv_bytes(&bytes, &path.display().to_string())
    }

    /// Parse raw CSV bytes. `origin` is only recorded, never dereferenced.
    pub fn from_csv_bytes(bytes: &[u8], origin: &str) -> LoadResult<Self> {
        let manifest = parse_bytes_auto(bytes)?;

        if manifest.passengers.is_empty() {
            return Err(LoadError::Empty);
        }

        log_success(format!(
            "Loaded {} passengers ({}, delimiter '{}')",
            manifest.passengers.len(),
            manifest.encoding,
            manifest.delimiter
        ));

        Ok(Self::with_info(
            manifest.passengers,
            SourceInfo {
                origin: origin.to_string(),
                encoding: manifest.encoding,
                delimiter: manifest.delimiter,
                headers: manifest.headers,
                row_count: 0,
            },
        ))
    }

    /// Wrap already-built records, e.g. fixtures.
    pub fn from_passengers(passengers: Vec<Passenger>) -> Self {
        Self::with_info(
            passengers,
            SourceInfo {
                origin: "memory".to_string(),
                encoding: "utf-8".to_string(),
                delimiter: ',',
                headers: Vec::new(),
                row_count: 0,
            },
        )
    }

    fn with_info(passengers: Vec<Passenger>, mut info: SourceInfo) -> Self {
        info.row_count = passengers.len();
        Self { passengers, info }
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn info(&self) -> &SourceInfo {
        &self.info
    }
}
