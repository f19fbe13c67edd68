//! Application configuration.
//!
//! Defaults are constants. `.env` and the process environment can override
//! them, and CLI flags override both.

use std::env;
use std::path::PathBuf;

/// Where the manifest is published.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/leontoddjohnson/datasets/main/data/titanic.csv";

/// Port the dashboard listens on.
pub const DEFAULT_PORT: u16 = 3000;

/// Overrides [`DEFAULT_DATASET_URL`].
pub const ENV_DATASET_URL: &str = "TITANIC_DATASET_URL";

/// Reads the manifest from a local file instead of the network. Wins over the URL.
pub const ENV_DATASET_PATH: &str = "TITANIC_DATASET_PATH";

/// Overrides [`DEFAULT_PORT`].
pub const ENV_PORT: &str = "TITANIC_EDA_PORT";

/// Where to read the manifest from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    File(PathBuf),
}

impl DatasetSource {
    /// Human-readable origin for logs and responses.
    pub fn describe(&self) -> String {
        match self {
            DatasetSource::Url(url) => url.clone(),
            DatasetSource::File(path) => path.display().to_string(),
        }
    }
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::Url(DEFAULT_DATASET_URL.to_string())
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub source: DatasetSource,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DatasetSource::default(),
            port: DEFAULT_PORT,
        }
    }
}

impl DashboardConfig {
    /// Build from `.env` (if present) and the environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable ports fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let source = match (lookup(ENV_DATASET_PATH), lookup(ENV_DATASET_URL)) {
            (Some(path), _) if !path.trim().is_empty() => DatasetSource::File(PathBuf::from(path)),
            (_, Some(url)) if !url.trim().is_empty() => DatasetSource::Url(url),
            _ => DatasetSource::default(),
        };

        let port = lookup(ENV_PORT)
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { source, port }
    }

    /// Apply CLI overrides on top of the environment.
    pub fn with_overrides(mut self, url: Option<String>, file: Option<PathBuf>) -> Self {
        if let Some(path) = file {
            self.source = DatasetSource::File(path);
        } else if let Some(url) = url {
            self.source = DatasetSource::Url(url);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::from_lookup(lookup(&[]));
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.source, DatasetSource::Url(DEFAULT_DATASET_URL.to_string()));
    }

    #[test]
    fn test_path_wins_over_url() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (ENV_DATASET_URL, "https://example.org/t.csv"),
            (ENV_DATASET_PATH, "/tmp/titanic.csv"),
            (ENV_PORT, "8080"),
        ]));
        assert_eq!(config.source, DatasetSource::File(PathBuf::from("/tmp/titanic.csv")));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = DashboardConfig::from_lookup(lookup(&[(ENV_PORT, "not-a-port")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_cli_overrides() {
        let config = DashboardConfig::default()
            .with_overrides(Some("https://example.org/t.csv".into()), None);
        assert_eq!(config.source, DatasetSource::Url("https://example.org/t.csv".into()));

        let config = config.with_overrides(None, Some(PathBuf::from("local.csv")));
        assert_eq!(config.source.describe(), "local.csv");
    }
}
