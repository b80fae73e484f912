use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Season half. Fall sorts before Spring so that (year, season_type) is a
/// deterministic chronological key; no cross-year ordering is assumed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    Fall,
    Spring,
}

impl SeasonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonType::Fall => "fall",
            SeasonType::Spring => "spring",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SeasonType::Fall => "Fall",
            SeasonType::Spring => "Spring",
        }
    }

    /// Accepts both the short form used by the source site ("F"/"S") and
    /// the long form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "f" | "fall" => Some(SeasonType::Fall),
            "s" | "spring" => Some(SeasonType::Spring),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Boys,
    Girls,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Boys => "boys",
            Gender::Girls => "girls",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Gender::Boys => "Boys",
            Gender::Girls => "Girls",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "b" | "boys" => Some(Gender::Boys),
            "g" | "girls" => Some(Gender::Girls),
            _ => None,
        }
    }
}

/// A soccer club detected from team names; owns teams across ages and seasons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub canonical_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A durable team identity that persists across many seasons.
///
/// `canonical_name` is the resolution key. The parsed attributes
/// (birth_year, gender, designation, base_club_name) are written once at
/// creation from the first successful parse and never overwritten by later
/// resolutions of the same team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub canonical_name: String,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub designation: Option<String>,
    /// Normalized parsed club name, the structured-match key. Kept
    /// denormalized on the team row so the attribute query filters on it
    /// directly.
    pub base_club_name: Option<String>,
    pub club_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for creating a new team row.
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub canonical_name: String,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub designation: Option<String>,
    pub base_club_name: Option<String>,
    pub club_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: Uuid,
    pub year: i32,
    pub season_type: SeasonType,
    pub season_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub id: Uuid,
    /// Identifier carried over from the source site.
    pub division_id: String,
    pub division_name: String,
    pub season_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamSeasonStats {
    #[serde(default)]
    pub wins: i32,
    #[serde(default)]
    pub losses: i32,
    #[serde(default)]
    pub ties: i32,
    #[serde(default)]
    pub forfeits: i32,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub goals_for: i32,
    #[serde(default)]
    pub goals_against: i32,
    #[serde(default)]
    pub goal_differential: i32,
}

/// A team's participation in one division for one season. Carries the exact
/// name string as it appeared that season. Unique per (team, division).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSeason {
    pub id: Uuid,
    pub team_id: Uuid,
    pub division_id: Uuid,
    pub team_name: String,
    #[serde(flatten)]
    pub stats: TeamSeasonStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Season context attached to every inbound standings record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonContext {
    pub year: i32,
    pub season_type: SeasonType,
    pub season_name: String,
}

/// One team row as scraped from a division standings table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStandingRow {
    pub team_name: String,
    #[serde(flatten)]
    pub stats: TeamSeasonStats,
}

/// A complete standings payload for one division in one season, the unit of
/// work handed to the import service by the (external) parsing layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionStandings {
    pub season: SeasonContext,
    pub division_id: String,
    pub division_name: String,
    pub teams: Vec<TeamStandingRow>,
}
