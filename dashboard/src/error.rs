//! Error types for the Titanic EDA dashboard.
//!
//! One enum per layer:
//!
//! - [`ParseError`] - CSV decoding and record parsing
//! - [`LoadError`] - Dataset retrieval (HTTP or file)
//! - [`ChartError`] - Chart assembly and rendering
//! - [`DashboardError`] - Top-level errors surfaced by the CLI and server
//!
//! Conversion is automatic via `From` implementations,
//! so `?` works across layer boundaries.

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while turning raw CSV bytes into passenger records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The content could not be decoded to text.
    #[error("Failed to decode content as {encoding}: {message}")]
    Encoding { encoding: String, message: String },

    /// A column the analysis depends on is absent from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A data row could not be read into a passenger record.
    #[error("Malformed record at line {line}: {message}")]
    Malformed { line: u64, message: String },

    /// No header row at all.
    #[error("CSV content is empty")]
    EmptyFile,

    /// Low-level reader failure.
    #[error("CSV reader error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Dataset Loading Errors
// =============================================================================

/// Errors while retrieving the passenger dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The HTTP request itself failed (DNS, TLS, connection, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Dataset source answered {status} for {url}")]
    Status { url: String, status: u16 },

    /// Reading a local dataset file failed.
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    /// The content was retrieved but could not be parsed.
    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] ParseError),

    /// Headers were present but no passenger rows.
    #[error("Dataset contains no passengers")]
    Empty,
}

// =============================================================================
// Chart Errors
// =============================================================================

/// Errors while assembling or rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// A chart spec references a column the tidy table does not have.
    #[error("Unknown field '{0}' in chart data")]
    UnknownField(String),

    /// An aggregation was asked to average or sum a non-numeric value.
    #[error("Field '{field}' holds a non-numeric value: {value}")]
    NotNumeric { field: String, value: String },

    /// A chart spec is missing a mapping its chart kind requires.
    #[error("Chart '{title}' requires a '{channel}' field")]
    MissingChannel { title: String, channel: &'static str },
}

// =============================================================================
// Dashboard Errors (top-level)
// =============================================================================

/// Top-level error returned by the CLI commands and HTTP handlers.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Dataset could not be loaded.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Chart could not be built.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Output serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing output or binding the server failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for dataset loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;

/// Result type for CLI and server operations.
pub type DashboardResult<T> = Result<T, DashboardError>;
