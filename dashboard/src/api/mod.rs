//! HTTP API module.
//!
//! Dashboard page, chart and table endpoints, and the log stream.

pub mod logs;
pub mod page;
pub mod server;
pub mod types;

pub use logs::*;
pub use server::{router, serve, AppState};
pub use types::*;
