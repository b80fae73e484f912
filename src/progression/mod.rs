//! Cross-season progression reconstruction.
//!
//! Groups a team's season appearances by the age-group window embedded in
//! each division name and reports only teams spanning at least two
//! windows; a single-window team carries no progression signal.

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::age_group::{calculate_age_group, extract_age_group, AgeGroup};
use crate::config::MatchingConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::matching;
use crate::models::{SeasonType, Team, TeamSeasonStats};
use crate::parser::normalize_name;
use crate::repositories::{ClubRepository, TeamRepository, TeamSeasonRepository};

/// Which teams to reconstruct progressions for.
#[derive(Debug, Clone)]
pub enum ProgressionFilter {
    /// One team, located by raw name (exact canonical first, then fuzzy).
    Team(String),
    /// All teams belonging to a club, located by club name.
    Club(String),
    All,
}

/// One appearance of a team in a division, with its season context and
/// the expected age group from the team's birth year for cross-checking.
#[derive(Debug, Clone, Serialize)]
pub struct Appearance {
    pub season_name: String,
    pub year: i32,
    pub season_type: SeasonType,
    pub division_name: String,
    pub team_name: String,
    pub stats: TeamSeasonStats,
    pub expected_age_group: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgeGroupProgression {
    pub age_group: String,
    pub age_min: i32,
    pub age_max: i32,
    pub appearances: Vec<Appearance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamProgression {
    pub team_id: Uuid,
    pub team_name: String,
    pub club_name: Option<String>,
    pub progression: Vec<AgeGroupProgression>,
    pub age_groups_played: usize,
    pub total_seasons: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressionReport {
    pub teams: Vec<TeamProgression>,
    /// Season rows whose division carried no extractable age-group token.
    /// A data-quality signal, not a fault.
    pub skipped_rows: usize,
}

pub struct ProgressionTracker {
    database: Database,
    matching: MatchingConfig,
}

impl ProgressionTracker {
    pub fn new(database: Database, matching: MatchingConfig) -> Self {
        Self { database, matching }
    }

    pub async fn track(&self, filter: ProgressionFilter) -> AppResult<ProgressionReport> {
        let pool = self.database.pool();
        let mut conn = pool.acquire().await?;

        let teams = self.select_teams(&mut conn, filter).await?;

        let mut report = ProgressionReport {
            teams: Vec::new(),
            skipped_rows: 0,
        };

        for team in teams {
            if let Some(progression) = self
                .build_progression(&mut conn, &team, &mut report.skipped_rows)
                .await?
            {
                report.teams.push(progression);
            }
        }

        // Most diverse progressions first
        report.teams.sort_by(|a, b| {
            (b.age_groups_played, b.total_seasons).cmp(&(a.age_groups_played, a.total_seasons))
        });

        Ok(report)
    }

    async fn select_teams(
        &self,
        conn: &mut SqliteConnection,
        filter: ProgressionFilter,
    ) -> AppResult<Vec<Team>> {
        match filter {
            ProgressionFilter::All => Ok(TeamRepository::list_all(conn).await?),
            ProgressionFilter::Club(club_name) => {
                let canonical = normalize_name(&club_name);
                match ClubRepository::find_by_canonical_name(conn, &canonical).await? {
                    Some(club) => Ok(TeamRepository::find_by_club(conn, club.id).await?),
                    None => Ok(Vec::new()),
                }
            }
            ProgressionFilter::Team(raw_name) => {
                let normalized = normalize_name(&raw_name);
                if let Some(team) =
                    TeamRepository::find_by_canonical_name(conn, &normalized).await?
                {
                    return Ok(vec![team]);
                }
                // Fuzzy lookup without creating anything
                let all_teams = TeamRepository::list_all(conn).await?;
                let named = all_teams.into_iter().map(|t| (t.canonical_name.clone(), t));
                match matching::best_match(&normalized, named) {
                    Some((team, score)) if score >= self.matching.accept_threshold => {
                        Ok(vec![team])
                    }
                    _ => Ok(Vec::new()),
                }
            }
        }
    }

    /// Build one team's progression, or None when it spans fewer than two
    /// age-group windows.
    async fn build_progression(
        &self,
        conn: &mut SqliteConnection,
        team: &Team,
        skipped_rows: &mut usize,
    ) -> AppResult<Option<TeamProgression>> {
        let rows = TeamSeasonRepository::list_for_team_with_context(conn, team.id).await?;
        if rows.is_empty() {
            return Ok(None);
        }

        let total_seasons = rows.len();
        let mut windows: BTreeMap<AgeGroup, Vec<Appearance>> = BTreeMap::new();

        for row in rows {
            let Some(age_group) = extract_age_group(&row.division_name) else {
                debug!(
                    "skipping team-season '{}': no age-group token in division '{}'",
                    row.team_season.team_name, row.division_name
                );
                *skipped_rows += 1;
                continue;
            };

            let expected = team.birth_year.and_then(|birth_year| {
                calculate_age_group(birth_year, row.season_year, row.season_type)
            });
            if let Some(expected) = expected {
                if expected.min_age < age_group.min_age || expected.min_age > age_group.max_age {
                    warn!(
                        "team '{}' played {} in {} but expected {} from birth year",
                        team.canonical_name,
                        age_group.label(),
                        row.season_name,
                        expected.label()
                    );
                }
            }

            windows.entry(age_group).or_default().push(Appearance {
                season_name: row.season_name,
                year: row.season_year,
                season_type: row.season_type,
                division_name: row.division_name,
                team_name: row.team_season.team_name,
                stats: row.team_season.stats,
                expected_age_group: expected.map(|g| g.label()),
            });
        }

        // Single-window teams carry no progression signal
        if windows.len() < 2 {
            return Ok(None);
        }

        // BTreeMap iteration gives windows ascending by (min_age, max_age)
        let progression = windows
            .into_iter()
            .map(|(age_group, mut appearances)| {
                appearances.sort_by(|a, b| (a.year, a.season_type).cmp(&(b.year, b.season_type)));
                AgeGroupProgression {
                    age_group: age_group.label(),
                    age_min: age_group.min_age,
                    age_max: age_group.max_age,
                    appearances,
                }
            })
            .collect::<Vec<_>>();

        let club_name = match team.club_id {
            Some(club_id) => ClubRepository::find_by_id(conn, club_id)
                .await?
                .map(|c| c.name),
            None => None,
        };

        Ok(Some(TeamProgression {
            team_id: team.id,
            team_name: team.canonical_name.clone(),
            club_name,
            age_groups_played: progression.len(),
            total_seasons,
            progression,
        }))
    }
}
