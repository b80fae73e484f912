//! JSON-file standings source.
//!
//! Each file holds either a single `DivisionStandings` object or an array
//! of them, as produced by the upstream scrape/parse tooling.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::ingest::StandingsSource;
use crate::models::DivisionStandings;

pub struct JsonFileSource {
    paths: Vec<PathBuf>,
}

impl JsonFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl StandingsSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<DivisionStandings>> {
        let mut payloads = Vec::new();

        for path in &self.paths {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading standings file {}", path.display()))?;

            let mut parsed = parse_payloads(&contents)
                .with_context(|| format!("parsing standings file {}", path.display()))?;

            debug!("loaded {} payload(s) from {}", parsed.len(), path.display());
            payloads.append(&mut parsed);
        }

        Ok(payloads)
    }
}

fn parse_payloads(contents: &str) -> Result<Vec<DivisionStandings>> {
    // Array form first, then a single object
    if let Ok(many) = serde_json::from_str::<Vec<DivisionStandings>>(contents) {
        return Ok(many);
    }
    let one = serde_json::from_str::<DivisionStandings>(contents)?;
    Ok(vec![one])
}
