//! Season and division data access.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::errors::{RepositoryError, RepositoryResult};
use crate::models::{Division, Season, SeasonType};
use crate::repositories::parse_uuid;

pub struct SeasonRepository;

impl SeasonRepository {
    pub async fn get_season(
        conn: &mut SqliteConnection,
        year: i32,
        season_type: SeasonType,
    ) -> RepositoryResult<Option<Season>> {
        let row = sqlx::query(
            "SELECT id, year, season_type, season_name, created_at
             FROM seasons WHERE year = ? AND season_type = ?",
        )
        .bind(year)
        .bind(season_type.as_str())
        .fetch_optional(&mut *conn)
        .await?;

        row.map(map_season).transpose()
    }

    /// Get a season by its (year, season_type) key, creating it on first
    /// sight. An existing row's display name is updated when the source
    /// pages disagree with what was stored.
    pub async fn get_or_create_season(
        conn: &mut SqliteConnection,
        year: i32,
        season_type: SeasonType,
        season_name: &str,
    ) -> RepositoryResult<Season> {
        if let Some(mut season) = Self::get_season(conn, year, season_type).await? {
            if season.season_name != season_name {
                sqlx::query("UPDATE seasons SET season_name = ? WHERE id = ?")
                    .bind(season_name)
                    .bind(season.id.to_string())
                    .execute(&mut *conn)
                    .await?;
                season.season_name = season_name.to_string();
            }
            return Ok(season);
        }

        let season = Season {
            id: Uuid::new_v4(),
            year,
            season_type,
            season_name: season_name.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO seasons (id, year, season_type, season_name, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(season.id.to_string())
        .bind(season.year)
        .bind(season.season_type.as_str())
        .bind(&season.season_name)
        .bind(season.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await?;

        Ok(season)
    }

    /// Get a division by its source-site id within a season, creating it
    /// on first sight.
    pub async fn get_or_create_division(
        conn: &mut SqliteConnection,
        division_id: &str,
        division_name: &str,
        season_id: Uuid,
    ) -> RepositoryResult<Division> {
        let row = sqlx::query(
            "SELECT id, division_id, division_name, season_id, created_at
             FROM divisions WHERE division_id = ? AND season_id = ?",
        )
        .bind(division_id)
        .bind(season_id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(row) = row {
            return map_division(row);
        }

        let division = Division {
            id: Uuid::new_v4(),
            division_id: division_id.to_string(),
            division_name: division_name.to_string(),
            season_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO divisions (id, division_id, division_name, season_id, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(division.id.to_string())
        .bind(&division.division_id)
        .bind(&division.division_name)
        .bind(division.season_id.to_string())
        .bind(division.created_at.to_rfc3339())
        .execute(&mut *conn)
        .await?;

        Ok(division)
    }

    pub async fn count_seasons(conn: &mut SqliteConnection) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM seasons")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }

    pub async fn count_divisions(conn: &mut SqliteConnection) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM divisions")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}

fn map_season(row: sqlx::sqlite::SqliteRow) -> RepositoryResult<Season> {
    let type_str: String = row.get("season_type");
    let season_type = SeasonType::parse(&type_str).ok_or_else(|| {
        RepositoryError::query_failed("seasons.season_type", format!("invalid value: {type_str}"))
    })?;

    Ok(Season {
        id: parse_uuid("seasons.id", &row.get::<String, _>("id"))?,
        year: row.get("year"),
        season_type,
        season_name: row.get("season_name"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    })
}

fn map_division(row: sqlx::sqlite::SqliteRow) -> RepositoryResult<Division> {
    Ok(Division {
        id: parse_uuid("divisions.id", &row.get::<String, _>("id"))?,
        division_id: row.get("division_id"),
        division_name: row.get("division_name"),
        season_id: parse_uuid("divisions.season_id", &row.get::<String, _>("season_id"))?,
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    })
}
