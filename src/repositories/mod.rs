//! Repository pattern implementation for data access
//!
//! This module is the persistence collaborator consumed by the resolver,
//! candidate generator and progression tracker. Every operation takes a
//! `&mut SqliteConnection` so the caller decides the transaction boundary:
//! the resolver wraps each resolve-or-create unit of work in one
//! transaction and passes `&mut *tx` down, while read-only callers hand in
//! a plain pooled connection.

pub mod clubs;
pub mod seasons;
pub mod team_seasons;
pub mod teams;

pub use clubs::ClubRepository;
pub use seasons::SeasonRepository;
pub use team_seasons::{TeamSeasonContextRow, TeamSeasonRepository};
pub use teams::TeamRepository;

use crate::errors::RepositoryError;
use uuid::Uuid;

/// Parse a TEXT column holding a UUID, attributing failures to the column.
pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value)
        .map_err(|e| RepositoryError::query_failed(column, format!("invalid uuid {value}: {e}")))
}
