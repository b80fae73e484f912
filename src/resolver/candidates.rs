//! Ranked, explained candidate matches for human review.
//!
//! Runs the same strategies as the resolver but collects every match
//! instead of short-circuiting, never creates entities, and uses the lower
//! review threshold for fuzzy scores.

use serde::Serialize;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::config::MatchingConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::matching;
use crate::models::{Gender, Team};
use crate::parser::{normalize_name, ParsedTeamName, TeamNameParser};
use crate::repositories::{ClubRepository, TeamRepository, TeamSeasonRepository};
use crate::resolver::pick_structured_match;

/// How many fuzzy candidates to consider, mirroring the review tooling's
/// page size.
const FUZZY_CANDIDATE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    ExactName,
    BirthYearClub,
    BaseIdentifier,
    Fuzzy,
}

/// One candidate match with its reviewer-facing evidence.
#[derive(Debug, Clone, Serialize)]
pub struct MatchCandidate {
    pub team_id: Uuid,
    pub team_name: String,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub club: Option<String>,
    pub designation: Option<String>,
    pub match_type: MatchType,
    pub confidence: u32,
    pub reason: String,
    pub seasons_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub original_name: String,
    pub parsed: ParsedTeamName,
    pub candidates: Vec<MatchCandidate>,
    /// Index into `candidates`, or None when the list is empty.
    pub recommended_index: Option<usize>,
}

pub struct CandidateGenerator {
    database: Database,
    parser: TeamNameParser,
    matching: MatchingConfig,
}

impl CandidateGenerator {
    pub fn new(database: Database, matching: MatchingConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            database,
            parser: TeamNameParser::new()?,
            matching,
        })
    }

    /// Collect candidate matches for a raw name. An empty list is a
    /// legitimate outcome, not an error.
    pub async fn candidates(&self, raw_name: &str) -> AppResult<CandidateReport> {
        let pool = self.database.pool();
        let mut conn = pool.acquire().await?;

        let parsed = self.parser.parse(raw_name);
        let normalized = normalize_name(raw_name);

        let mut seen: Vec<Uuid> = Vec::new();
        let mut collected: Vec<(Team, MatchType, u32, String)> = Vec::new();

        // Strategy 1: exact canonical name match
        if let Some(team) = TeamRepository::find_by_canonical_name(&mut conn, &normalized).await? {
            seen.push(team.id);
            collected.push((
                team,
                MatchType::ExactName,
                100,
                "Exact canonical name match".to_string(),
            ));
        }

        // Strategies 2 + 3: structured tie-break pick, then every other
        // base-identifier sibling
        if let (true, Some(birth_year), Some(gender), Some(club_name)) = (
            parsed.parsed,
            parsed.birth_year,
            parsed.gender,
            parsed.club_name.as_deref(),
        ) {
            let base_club = normalize_name(club_name);
            let attribute_teams =
                TeamRepository::find_by_attributes(&mut conn, birth_year, gender, &base_club)
                    .await?;

            if let Some(picked) =
                pick_structured_match(attribute_teams.clone(), parsed.designation.as_deref())
            {
                if !seen.contains(&picked.id) {
                    let confidence = match (&parsed.designation, &picked.designation) {
                        (Some(want), Some(have)) if want.eq_ignore_ascii_case(have) => 100,
                        _ => 95,
                    };
                    let reason = format!(
                        "Birth year {}, {}, club {} match",
                        birth_year,
                        gender.display_name(),
                        club_name
                    );
                    seen.push(picked.id);
                    collected.push((picked, MatchType::BirthYearClub, confidence, reason));
                }
            }

            for team in attribute_teams {
                if seen.contains(&team.id) {
                    continue;
                }
                let confidence = if parsed.designation.is_none() && team.designation.is_none() {
                    90
                } else {
                    85
                };
                seen.push(team.id);
                collected.push((
                    team,
                    MatchType::BaseIdentifier,
                    confidence,
                    "Base identifier match (designation may differ)".to_string(),
                ));
            }
        }

        // Strategy 4: fuzzy matches at the review threshold
        let all_teams = TeamRepository::list_all(&mut conn).await?;
        let named = all_teams.into_iter().map(|t| (t.canonical_name.clone(), t));
        let ranked = matching::rank_matches(&normalized, named, self.matching.review_threshold);
        for (team, score) in ranked.into_iter().take(FUZZY_CANDIDATE_LIMIT) {
            if seen.contains(&team.id) {
                continue;
            }
            let reason = format!("Fuzzy string match ({score}% similarity)");
            seen.push(team.id);
            collected.push((team, MatchType::Fuzzy, score, reason));
        }

        // Highest confidence first; stable sort keeps strategy order on ties
        collected.sort_by(|a, b| b.2.cmp(&a.2));

        let mut candidates = Vec::with_capacity(collected.len());
        for (team, match_type, confidence, reason) in collected {
            candidates.push(self.describe(&mut conn, team, match_type, confidence, reason).await?);
        }

        let recommended_index = recommend(&candidates);

        Ok(CandidateReport {
            original_name: raw_name.trim().to_string(),
            parsed,
            candidates,
            recommended_index,
        })
    }

    async fn describe(
        &self,
        conn: &mut SqliteConnection,
        team: Team,
        match_type: MatchType,
        confidence: u32,
        reason: String,
    ) -> AppResult<MatchCandidate> {
        let club = match team.club_id {
            Some(club_id) => ClubRepository::find_by_id(conn, club_id)
                .await?
                .map(|c| c.name),
            None => None,
        };
        let seasons_count = TeamSeasonRepository::count_for_team(conn, team.id).await?;

        Ok(MatchCandidate {
            team_id: team.id,
            team_name: team.canonical_name,
            birth_year: team.birth_year,
            gender: team.gender,
            club,
            designation: team.designation,
            match_type,
            confidence,
            reason,
            seasons_count,
        })
    }
}

/// Pick the recommended candidate: the best one at confidence >= 90,
/// preferring exact/structured match types; otherwise the single
/// best-scoring candidate; None when the list is empty.
fn recommend(candidates: &[MatchCandidate]) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let high: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.confidence >= 90)
        .map(|(i, _)| i)
        .collect();

    if !high.is_empty() {
        let preferred = high.iter().copied().find(|&i| {
            matches!(
                candidates[i].match_type,
                MatchType::ExactName | MatchType::BirthYearClub
            )
        });
        return Some(preferred.unwrap_or(high[0]));
    }

    Some(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(match_type: MatchType, confidence: u32) -> MatchCandidate {
        MatchCandidate {
            team_id: Uuid::new_v4(),
            team_name: "x".to_string(),
            birth_year: None,
            gender: None,
            club: None,
            designation: None,
            match_type,
            confidence,
            reason: String::new(),
            seasons_count: 0,
        }
    }

    #[test]
    fn test_recommend_empty_is_none() {
        assert_eq!(recommend(&[]), None);
    }

    #[test]
    fn test_recommend_prefers_structured_over_base_at_equal_confidence() {
        let candidates = vec![
            candidate(MatchType::BaseIdentifier, 90),
            candidate(MatchType::BirthYearClub, 90),
        ];
        assert_eq!(recommend(&candidates), Some(1));
    }

    #[test]
    fn test_recommend_falls_back_to_best_low_confidence() {
        let candidates = vec![
            candidate(MatchType::Fuzzy, 82),
            candidate(MatchType::Fuzzy, 78),
        ];
        assert_eq!(recommend(&candidates), Some(0));
    }

    #[test]
    fn test_recommend_high_without_preferred_type() {
        let candidates = vec![
            candidate(MatchType::BaseIdentifier, 90),
            candidate(MatchType::Fuzzy, 88),
        ];
        assert_eq!(recommend(&candidates), Some(0));
    }
}
