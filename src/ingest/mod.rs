//! Standings import.
//!
//! The (external) fetch/parse layer hands this service complete
//! `DivisionStandings` payloads. Each payload is one resolve-or-update
//! unit of work: the service takes the global resolve lock, opens one
//! transaction, resolves every team name in the division and upserts the
//! matching team-season rows. Payloads fan out across a bounded worker
//! pool; resolution itself is serialized by the lock while parsing stays
//! parallel upstream.

pub mod json_source;

pub use json_source::JsonFileSource;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use crate::database::Database;
use crate::errors::AppResult;
use crate::models::DivisionStandings;
use crate::repositories::{SeasonRepository, TeamSeasonRepository};
use crate::resolver::IdentityResolver;

/// A provider of standings payloads (cache files, fixtures, ...).
#[async_trait]
pub trait StandingsSource {
    async fn load(&self) -> Result<Vec<DivisionStandings>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSummary {
    pub divisions: usize,
    pub team_seasons: usize,
    pub teams_created: usize,
    pub teams_matched: usize,
}

pub struct StandingsImportService {
    database: Database,
    resolver: IdentityResolver,
    worker_concurrency: usize,
}

impl StandingsImportService {
    pub fn new(
        database: Database,
        resolver: IdentityResolver,
        worker_concurrency: usize,
    ) -> Self {
        Self {
            database,
            resolver,
            worker_concurrency: worker_concurrency.max(1),
        }
    }

    /// Import every payload, fanning out across the worker pool.
    pub async fn import_all(&self, payloads: Vec<DivisionStandings>) -> AppResult<ImportSummary> {
        let outcomes: Vec<ImportSummary> = stream::iter(payloads)
            .map(|payload| self.import_division(payload))
            .buffer_unordered(self.worker_concurrency)
            .try_collect()
            .await?;

        let mut summary = ImportSummary::default();
        for outcome in outcomes {
            summary.divisions += outcome.divisions;
            summary.team_seasons += outcome.team_seasons;
            summary.teams_created += outcome.teams_created;
            summary.teams_matched += outcome.teams_matched;
        }

        info!(
            "import complete: {} divisions, {} team-seasons, {} teams created, {} matched",
            summary.divisions, summary.team_seasons, summary.teams_created, summary.teams_matched
        );

        Ok(summary)
    }

    /// Import one division's standings as a single locked transaction.
    /// Partial writes are never observable across workers: either the
    /// season, division, teams and team-seasons all land, or none do.
    pub async fn import_division(
        &self,
        standings: DivisionStandings,
    ) -> AppResult<ImportSummary> {
        let _guard = self.database.acquire_resolve_lock().await;
        let pool = self.database.pool();
        let mut tx = pool.begin().await?;

        let season = SeasonRepository::get_or_create_season(
            &mut tx,
            standings.season.year,
            standings.season.season_type,
            &standings.season.season_name,
        )
        .await?;

        let division = SeasonRepository::get_or_create_division(
            &mut tx,
            &standings.division_id,
            &standings.division_name,
            season.id,
        )
        .await?;

        let mut summary = ImportSummary {
            divisions: 1,
            ..Default::default()
        };

        for row in &standings.teams {
            let outcome = self.resolver.resolve_in(&mut tx, &row.team_name).await?;
            if outcome.is_new {
                summary.teams_created += 1;
            } else {
                summary.teams_matched += 1;
            }

            TeamSeasonRepository::upsert(
                &mut tx,
                outcome.team.id,
                division.id,
                &row.team_name,
                row.stats,
            )
            .await?;
            summary.team_seasons += 1;
        }

        tx.commit().await?;

        info!(
            "imported '{}' ({}): {} team-seasons",
            standings.division_name, season.season_name, summary.team_seasons
        );

        Ok(summary)
    }
}
