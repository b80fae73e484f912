//! Team data access.
//!
//! `find_by_attributes` is the structured-match query; its `ORDER BY
//! created_at, id` makes "first candidate" mean "first created", which the
//! designation tie-break depends on.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::errors::RepositoryResult;
use crate::models::{Gender, NewTeam, Team};
use crate::repositories::parse_uuid;

const TEAM_COLUMNS: &str = "id, canonical_name, birth_year, gender, designation, \
                            base_club_name, club_id, created_at, updated_at";

pub struct TeamRepository;

impl TeamRepository {
    pub async fn find_by_canonical_name(
        conn: &mut SqliteConnection,
        canonical_name: &str,
    ) -> RepositoryResult<Option<Team>> {
        let row = sqlx::query(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE canonical_name = ?"
        ))
        .bind(canonical_name)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(map_team).transpose()
    }

    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: Uuid,
    ) -> RepositoryResult<Option<Team>> {
        let row = sqlx::query(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await?;

        row.map(map_team).transpose()
    }

    /// Teams sharing the base identifier (birth year, gender, normalized
    /// club), in stable first-created order.
    pub async fn find_by_attributes(
        conn: &mut SqliteConnection,
        birth_year: i32,
        gender: Gender,
        base_club_name: &str,
    ) -> RepositoryResult<Vec<Team>> {
        let rows = sqlx::query(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams
             WHERE birth_year = ? AND gender = ? AND base_club_name = ?
             ORDER BY created_at, id"
        ))
        .bind(birth_year)
        .bind(gender.as_str())
        .bind(base_club_name)
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(map_team).collect()
    }

    pub async fn list_all(conn: &mut SqliteConnection) -> RepositoryResult<Vec<Team>> {
        let rows = sqlx::query(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams ORDER BY created_at, id"
        ))
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(map_team).collect()
    }

    pub async fn find_by_club(
        conn: &mut SqliteConnection,
        club_id: Uuid,
    ) -> RepositoryResult<Vec<Team>> {
        let rows = sqlx::query(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE club_id = ? ORDER BY created_at, id"
        ))
        .bind(club_id.to_string())
        .fetch_all(&mut *conn)
        .await?;

        rows.into_iter().map(map_team).collect()
    }

    pub async fn create(conn: &mut SqliteConnection, new_team: &NewTeam) -> RepositoryResult<Team> {
        let team = Team {
            id: Uuid::new_v4(),
            canonical_name: new_team.canonical_name.clone(),
            birth_year: new_team.birth_year,
            gender: new_team.gender,
            designation: new_team.designation.clone(),
            base_club_name: new_team.base_club_name.clone(),
            club_id: new_team.club_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO teams (id, canonical_name, birth_year, gender, designation,
                                base_club_name, club_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(team.id.to_string())
        .bind(&team.canonical_name)
        .bind(team.birth_year)
        .bind(team.gender.map(|g| g.as_str()))
        .bind(&team.designation)
        .bind(&team.base_club_name)
        .bind(team.club_id.map(|id| id.to_string()))
        .bind(team.created_at.to_rfc3339())
        .bind(team.updated_at.to_rfc3339())
        .execute(&mut *conn)
        .await?;

        Ok(team)
    }

    pub async fn count(conn: &mut SqliteConnection) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teams")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}

fn map_team(row: sqlx::sqlite::SqliteRow) -> RepositoryResult<Team> {
    let club_id = row
        .get::<Option<String>, _>("club_id")
        .map(|s| parse_uuid("teams.club_id", &s))
        .transpose()?;

    Ok(Team {
        id: parse_uuid("teams.id", &row.get::<String, _>("id"))?,
        canonical_name: row.get("canonical_name"),
        birth_year: row.get("birth_year"),
        gender: row
            .get::<Option<String>, _>("gender")
            .and_then(|s| Gender::parse(&s)),
        designation: row.get("designation"),
        base_club_name: row.get("base_club_name"),
        club_id,
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}
