//! TeamSeason data access.
//!
//! One row per (team, division); re-importing the same standings updates
//! the stored statistics in place instead of duplicating the row.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{SeasonType, TeamSeason, TeamSeasonStats};
use crate::repositories::parse_uuid;

/// A team-season row joined with its division and season context, the
/// shape the progression tracker consumes.
#[derive(Debug, Clone)]
pub struct TeamSeasonContextRow {
    pub team_season: TeamSeason,
    pub division_name: String,
    pub season_name: String,
    pub season_year: i32,
    pub season_type: SeasonType,
}

pub struct TeamSeasonRepository;

impl TeamSeasonRepository {
    pub async fn find_by_team_and_division(
        conn: &mut SqliteConnection,
        team_id: Uuid,
        division_id: Uuid,
    ) -> RepositoryResult<Option<TeamSeason>> {
        let row = sqlx::query(
            "SELECT id, team_id, division_id, team_name, wins, losses, ties, forfeits,
                    points, goals_for, goals_against, goal_differential, created_at, updated_at
             FROM team_seasons WHERE team_id = ? AND division_id = ?",
        )
        .bind(team_id.to_string())
        .bind(division_id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        row.map(map_team_season).transpose()
    }

    /// Create the (team, division) row or refresh its statistics and
    /// as-appeared name. Re-runs converge on one row per pair.
    pub async fn upsert(
        conn: &mut SqliteConnection,
        team_id: Uuid,
        division_id: Uuid,
        team_name: &str,
        stats: TeamSeasonStats,
    ) -> RepositoryResult<TeamSeason> {
        if let Some(mut existing) = Self::find_by_team_and_division(conn, team_id, division_id).await? {
            let now = Utc::now();
            sqlx::query(
                "UPDATE team_seasons
                 SET team_name = ?, wins = ?, losses = ?, ties = ?, forfeits = ?,
                     points = ?, goals_for = ?, goals_against = ?, goal_differential = ?,
                     updated_at = ?
                 WHERE id = ?",
            )
            .bind(team_name)
            .bind(stats.wins)
            .bind(stats.losses)
            .bind(stats.ties)
            .bind(stats.forfeits)
            .bind(stats.points)
            .bind(stats.goals_for)
            .bind(stats.goals_against)
            .bind(stats.goal_differential)
            .bind(now.to_rfc3339())
            .bind(existing.id.to_string())
            .execute(&mut *conn)
            .await?;

            existing.team_name = team_name.to_string();
            existing.stats = stats;
            existing.updated_at = now;
            return Ok(existing);
        }

        let team_season = TeamSeason {
            id: Uuid::new_v4(),
            team_id,
            division_id,
            team_name: team_name.to_string(),
            stats,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO team_seasons (id, team_id, division_id, team_name, wins, losses,
                                       ties, forfeits, points, goals_for, goals_against,
                                       goal_differential, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(team_season.id.to_string())
        .bind(team_season.team_id.to_string())
        .bind(team_season.division_id.to_string())
        .bind(&team_season.team_name)
        .bind(stats.wins)
        .bind(stats.losses)
        .bind(stats.ties)
        .bind(stats.forfeits)
        .bind(stats.points)
        .bind(stats.goals_for)
        .bind(stats.goals_against)
        .bind(stats.goal_differential)
        .bind(team_season.created_at.to_rfc3339())
        .bind(team_season.updated_at.to_rfc3339())
        .execute(&mut *conn)
        .await?;

        Ok(team_season)
    }

    /// All appearances for one team with division and season context,
    /// ordered chronologically by the deterministic (year, season_type)
    /// key.
    pub async fn list_for_team_with_context(
        conn: &mut SqliteConnection,
        team_id: Uuid,
    ) -> RepositoryResult<Vec<TeamSeasonContextRow>> {
        let rows = sqlx::query(
            "SELECT ts.id, ts.team_id, ts.division_id, ts.team_name, ts.wins, ts.losses,
                    ts.ties, ts.forfeits, ts.points, ts.goals_for, ts.goals_against,
                    ts.goal_differential, ts.created_at, ts.updated_at,
                    d.division_name, s.season_name, s.year AS season_year,
                    s.season_type AS season_type
             FROM team_seasons ts
             JOIN divisions d ON ts.division_id = d.id
             JOIN seasons s ON d.season_id = s.id
             WHERE ts.team_id = ?
             ORDER BY s.year, s.season_type, d.division_name",
        )
        .bind(team_id.to_string())
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(map_context_row).collect()
    }

    pub async fn count_for_team(
        conn: &mut SqliteConnection,
        team_id: Uuid,
    ) -> RepositoryResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_seasons WHERE team_id = ?")
                .bind(team_id.to_string())
                .fetch_one(conn)
                .await?;
        Ok(count)
    }

    pub async fn count(conn: &mut SqliteConnection) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_seasons")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}

fn map_team_season(row: sqlx::sqlite::SqliteRow) -> RepositoryResult<TeamSeason> {
    Ok(TeamSeason {
        id: parse_uuid("team_seasons.id", &row.get::<String, _>("id"))?,
        team_id: parse_uuid("team_seasons.team_id", &row.get::<String, _>("team_id"))?,
        division_id: parse_uuid(
            "team_seasons.division_id",
            &row.get::<String, _>("division_id"),
        )?,
        team_name: row.get("team_name"),
        stats: TeamSeasonStats {
            wins: row.get("wins"),
            losses: row.get("losses"),
            ties: row.get("ties"),
            forfeits: row.get("forfeits"),
            points: row.get("points"),
            goals_for: row.get("goals_for"),
            goals_against: row.get("goals_against"),
            goal_differential: row.get("goal_differential"),
        },
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}

fn map_context_row(row: sqlx::sqlite::SqliteRow) -> RepositoryResult<TeamSeasonContextRow> {
    let type_str: String = row.get("season_type");
    let season_type = SeasonType::parse(&type_str).ok_or_else(|| {
        RepositoryError::query_failed("seasons.season_type", format!("invalid value: {type_str}"))
    })?;

    let division_name: String = row.get("division_name");
    let season_name: String = row.get("season_name");
    let season_year: i32 = row.get("season_year");
    let team_season = map_team_season(row)?;

    Ok(TeamSeasonContextRow {
        team_season,
        division_name,
        season_name,
        season_year,
        season_type,
    })
}
