//! Team identity resolution.
//!
//! `IdentityResolver` decides which durable `Team` a raw name refers to,
//! using an ordered strategy chain; `CandidateGenerator` runs the same
//! strategies without committing a decision, for human review.

pub mod candidates;

pub use candidates::{CandidateGenerator, CandidateReport, MatchCandidate, MatchType};

use sqlx::SqliteConnection;
use tracing::debug;

use crate::config::MatchingConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::matching;
use crate::models::{NewTeam, Team};
use crate::parser::{extract_club_name, normalize_name, ParsedTeamName, TeamNameParser};
use crate::repositories::{ClubRepository, TeamRepository};

/// Result of resolving one raw name.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub team: Team,
    pub is_new: bool,
}

/// Resolves raw team names to durable team identities.
///
/// Strategy chain, each tier tried only when the previous yields nothing:
/// 1. exact canonical-name match
/// 2. structured attribute match (birth year + gender + normalized club)
/// 3. fuzzy similarity against all canonical names, auto-accepted at the
///    configured threshold
/// 4. create a new team
///
/// The chain never fails to produce a team; the only errors that
/// propagate are persistence failures.
pub struct IdentityResolver {
    database: Database,
    parser: TeamNameParser,
    matching: MatchingConfig,
}

impl IdentityResolver {
    pub fn new(database: Database, matching: MatchingConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            database,
            parser: TeamNameParser::new()?,
            matching,
        })
    }

    /// Resolve one raw name as its own unit of work: takes the global
    /// resolve lock and wraps the lookup-or-create in one transaction.
    pub async fn resolve(&self, raw_name: &str) -> AppResult<ResolutionOutcome> {
        let _guard = self.database.acquire_resolve_lock().await;
        let pool = self.database.pool();
        let mut tx = pool.begin().await?;
        let outcome = self.resolve_in(&mut tx, raw_name).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    /// Resolve within a caller-owned transaction. The caller must already
    /// hold the resolve lock; the import service batches many names into
    /// one locked transaction this way.
    pub async fn resolve_in(
        &self,
        conn: &mut SqliteConnection,
        raw_name: &str,
    ) -> AppResult<ResolutionOutcome> {
        let normalized = normalize_name(raw_name);

        // Strategy 1: exact canonical match
        if let Some(team) = TeamRepository::find_by_canonical_name(conn, &normalized).await? {
            debug!("resolved '{}' by exact canonical match", raw_name);
            return Ok(ResolutionOutcome {
                team,
                is_new: false,
            });
        }

        let parsed = self.parser.parse(raw_name);

        // Strategy 2: structured attribute match
        if let Some(team) = self.structured_match(conn, &parsed).await? {
            debug!(
                "resolved '{}' by structured attributes (birth_year={:?})",
                raw_name, parsed.birth_year
            );
            return Ok(ResolutionOutcome {
                team,
                is_new: false,
            });
        }

        // Strategy 3: fuzzy fallback over all canonical names
        let all_teams = TeamRepository::list_all(conn).await?;
        let named = all_teams
            .into_iter()
            .map(|t| (t.canonical_name.clone(), t));
        if let Some((team, score)) = matching::best_match(&normalized, named) {
            if score >= self.matching.accept_threshold {
                debug!(
                    "resolved '{}' by fuzzy match to '{}' (score {})",
                    raw_name, team.canonical_name, score
                );
                return Ok(ResolutionOutcome {
                    team,
                    is_new: false,
                });
            }
        }

        // Strategy 4: create
        let team = self.create_team(conn, raw_name, &normalized, &parsed).await?;
        debug!("created new team '{}' for '{}'", team.canonical_name, raw_name);
        Ok(ResolutionOutcome { team, is_new: true })
    }

    /// Find teams sharing (birth year, gender, normalized club) and apply
    /// the designation tie-break. Requires all three attributes from the
    /// parse; otherwise the tier yields nothing.
    async fn structured_match(
        &self,
        conn: &mut SqliteConnection,
        parsed: &ParsedTeamName,
    ) -> AppResult<Option<Team>> {
        if !parsed.parsed {
            return Ok(None);
        }
        let (Some(birth_year), Some(gender), Some(club_name)) =
            (parsed.birth_year, parsed.gender, parsed.club_name.as_deref())
        else {
            return Ok(None);
        };

        let base_club = normalize_name(club_name);
        let candidates =
            TeamRepository::find_by_attributes(conn, birth_year, gender, &base_club).await?;

        Ok(pick_structured_match(candidates, parsed.designation.as_deref()))
    }

    async fn create_team(
        &self,
        conn: &mut SqliteConnection,
        raw_name: &str,
        normalized: &str,
        parsed: &ParsedTeamName,
    ) -> AppResult<Team> {
        // Richer parsed club name first; the regex fallback heuristic is
        // last-resort only.
        let club_name = parsed
            .club_name
            .clone()
            .or_else(|| extract_club_name(raw_name));

        let club_id = match club_name {
            Some(name) => Some(ClubRepository::get_or_create(conn, &name).await?.id),
            None => None,
        };

        let new_team = if parsed.parsed {
            NewTeam {
                canonical_name: normalized.to_string(),
                birth_year: parsed.birth_year,
                gender: parsed.gender,
                designation: parsed.designation.clone(),
                base_club_name: parsed.club_name.as_deref().map(normalize_name),
                club_id,
            }
        } else {
            NewTeam {
                canonical_name: normalized.to_string(),
                birth_year: None,
                gender: None,
                designation: None,
                base_club_name: None,
                club_id,
            }
        };

        let team = TeamRepository::create(conn, &new_team).await?;
        Ok(team)
    }
}

/// Designation tie-break over structured-match candidates.
///
/// A parsed designation prefers a stored designation that matches
/// case-insensitively; failing that, the first candidate in stored order
/// wins. This encodes the policy that a team recorded without a
/// designation in an earlier season is the same team that later acquires
/// one. It can conflate sibling teams that only differ by designation;
/// see DESIGN.md.
pub(crate) fn pick_structured_match(
    candidates: Vec<Team>,
    designation: Option<&str>,
) -> Option<Team> {
    if let Some(designation) = designation {
        if let Some(team) = candidates.iter().find(|t| {
            t.designation
                .as_deref()
                .is_some_and(|d| d.eq_ignore_ascii_case(designation))
        }) {
            return Some(team.clone());
        }
    }
    candidates.into_iter().next()
}
