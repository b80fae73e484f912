//! Club data access.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use crate::errors::RepositoryResult;
use crate::models::Club;
use crate::parser::normalize_name;
use crate::repositories::parse_uuid;

pub struct ClubRepository;

impl ClubRepository {
    pub async fn find_by_canonical_name(
        conn: &mut SqliteConnection,
        canonical_name: &str,
    ) -> RepositoryResult<Option<Club>> {
        let row = sqlx::query(
            "SELECT id, name, canonical_name, created_at, updated_at
             FROM clubs WHERE canonical_name = ?",
        )
        .bind(canonical_name)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(map_club).transpose()
    }

    /// Get a club by display name, creating it on first sight. The
    /// canonical (normalized) name is the uniqueness key.
    pub async fn get_or_create(
        conn: &mut SqliteConnection,
        club_name: &str,
    ) -> RepositoryResult<Club> {
        let canonical = normalize_name(club_name);

        if let Some(club) = Self::find_by_canonical_name(conn, &canonical).await? {
            return Ok(club);
        }

        let club = Club {
            id: Uuid::new_v4(),
            name: club_name.to_string(),
            canonical_name: canonical,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO clubs (id, name, canonical_name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(club.id.to_string())
        .bind(&club.name)
        .bind(&club.canonical_name)
        .bind(club.created_at.to_rfc3339())
        .bind(club.updated_at.to_rfc3339())
        .execute(&mut *conn)
        .await?;

        Ok(club)
    }

    pub async fn find_by_id(
        conn: &mut SqliteConnection,
        id: Uuid,
    ) -> RepositoryResult<Option<Club>> {
        let row = sqlx::query(
            "SELECT id, name, canonical_name, created_at, updated_at FROM clubs WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

        row.map(map_club).transpose()
    }

    pub async fn count(conn: &mut SqliteConnection) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clubs")
            .fetch_one(conn)
            .await?;
        Ok(count)
    }
}

fn map_club(row: sqlx::sqlite::SqliteRow) -> RepositoryResult<Club> {
    Ok(Club {
        id: parse_uuid("clubs.id", &row.get::<String, _>("id"))?,
        name: row.get("name"),
        canonical_name: row.get("canonical_name"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    })
}
