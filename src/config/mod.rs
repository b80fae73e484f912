use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub matching: MatchingConfig,
    pub ingestion: IngestionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
}

/// Thresholds for the fuzzy match strategy; both are policy decisions
/// independent of the similarity algorithm. Scores run 0-100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum similarity for the resolver to auto-accept a fuzzy match.
    pub accept_threshold: u32,
    /// Minimum similarity for a fuzzy candidate to be shown for review.
    pub review_threshold: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Fan-out degree for concurrent standings imports.
    pub worker_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://./teamtrack.db".to_string(),
                max_connections: Some(10),
            },
            matching: MatchingConfig {
                accept_threshold: 85,
                review_threshold: 75,
            },
            ingestion: IngestionConfig {
                worker_concurrency: 5,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }
}
