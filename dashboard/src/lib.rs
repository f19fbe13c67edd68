//! # Titanic EDA - survival and family-size analysis of the Titanic manifest
//!
//! Loads the passenger list once, derives summary tables from it and renders
//! two charts answering fixed questions, served as a small web dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV (HTTP  │────▶│   Dataset   │────▶│  Transform  │────▶│    Chart    │
//! │  or file)   │     │ (load once) │     │  (tables)   │     │  (Plotly)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use titanic_eda::{Dataset, DatasetSource, survival_demographics};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dataset = Dataset::load(&DatasetSource::default()).await.unwrap();
//!     for row in survival_demographics(&dataset) {
//!         println!("{} {} {:?}: {:?}", row.pclass, row.sex, row.age_group, row.survival_percentage);
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`config`] - Defaults and environment overrides
//! - [`models`] - Passenger record and derived categories
//! - [`parser`] - CSV decoding and typed parsing
//! - [`dataset`] - Loading the manifest
//! - [`transform`] - Summary tables
//! - [`chart`] - Chart specs and the Plotly renderer
//! - [`api`] - HTTP dashboard

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Loading
pub mod dataset;
pub mod parser;

// Analysis
pub mod chart;
pub mod transform;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{ChartError, DashboardError, LoadError, ParseError};

// =============================================================================
// Re-exports - Configuration and models
// =============================================================================

pub use config::{DashboardConfig, DatasetSource};
pub use models::{surname_of, AgeGroup, Passenger, PassengerClass, Sex};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use dataset::{Dataset, SourceInfo};
pub use parser::{decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, ParsedManifest};

// =============================================================================
// Re-exports - Transforms
// =============================================================================

pub use transform::{
    family_groups,
    family_size,
    last_names,
    survival_demographics,
    FamilySizeRow,
    FamilySummaryRow,
    SurnameCountRow,
    SurvivalSummaryRow,
};

// =============================================================================
// Re-exports - Charts
// =============================================================================

pub use chart::{
    demographic_chart,
    family_chart,
    ChartKind,
    ChartRenderer,
    ChartSpec,
    HistFunc,
    PlotlyRenderer,
    TidyTable,
};

// Server
pub mod server {
    pub use crate::api::server::{router, serve, AppState};
}
