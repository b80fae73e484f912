//! Team-name parsing and normalization.
//!
//! `team_name` extracts structured attributes (club, birth year, gender,
//! designation) from raw team-name strings; `normalize` produces the
//! canonical form used as the identity key; `club` is the last-resort
//! club-name heuristic used only when structured parsing yields no club.

pub mod club;
pub mod normalize;
pub mod team_name;

pub use club::extract_club_name;
pub use normalize::normalize_name;
pub use team_name::{ParsedTeamName, TeamNameParser};
