//! Age-group calculation and extraction.
//!
//! The competition age group ("U-age") is derived from birth year against
//! the August 1 cutoff; a Spring season is the continuation of the prior
//! Fall and uses the previous calendar year's cutoff.

use crate::models::SeasonType;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Valid competitive range; anything outside is treated as absent.
const MIN_U_AGE: i32 = 5;
const MAX_U_AGE: i32 = 19;

static RANGE_PATTERN: OnceLock<Regex> = OnceLock::new();
static SINGLE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// An age-group window. Single-age groups have `min_age == max_age`;
/// combined divisions like "U15/16" carry the full window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AgeGroup {
    pub min_age: i32,
    pub max_age: i32,
}

impl AgeGroup {
    pub fn single(age: i32) -> Self {
        Self {
            min_age: age,
            max_age: age,
        }
    }

    /// Human-readable label, e.g. "U10" or "U15/16".
    pub fn label(&self) -> String {
        if self.min_age == self.max_age {
            format!("U{}", self.min_age)
        } else {
            format!("U{}/{}", self.min_age, self.max_age)
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Compute the expected age group for a birth year in a given season.
///
/// Fall uses Aug 1 of the season year as the cutoff; Spring uses Aug 1 of
/// the previous calendar year. Players are placed in the age group they
/// turn into during the season, so age 7 on the cutoff means U8.
///
/// Pure and total: out-of-range results are `None`, never an error.
pub fn calculate_age_group(
    birth_year: i32,
    season_year: i32,
    season_type: SeasonType,
) -> Option<AgeGroup> {
    let cutoff_year = match season_type {
        SeasonType::Fall => season_year,
        SeasonType::Spring => season_year - 1,
    };

    let age_on_cutoff = cutoff_year - birth_year;
    let u_age = age_on_cutoff + 1;

    if !(MIN_U_AGE..=MAX_U_AGE).contains(&u_age) {
        return None;
    }

    Some(AgeGroup::single(u_age))
}

/// Extract the age-group window embedded in a division name.
///
/// Handles "U15/16 Boys Elite" (range) and "U11 Girls 2nd Division"
/// (single age). Returns `None` when the division name carries no age
/// token; callers treat that as a data-quality signal, not a fault.
pub fn extract_age_group(division_name: &str) -> Option<AgeGroup> {
    let range =
        RANGE_PATTERN.get_or_init(|| Regex::new(r"U(\d{1,2})/(\d{1,2})").expect("static pattern"));
    if let Some(caps) = range.captures(division_name) {
        let min_age: i32 = caps[1].parse().ok()?;
        let max_age: i32 = caps[2].parse().ok()?;
        return Some(AgeGroup { min_age, max_age });
    }

    let single = SINGLE_PATTERN.get_or_init(|| Regex::new(r"U(\d{1,2})\b").expect("static pattern"));
    if let Some(caps) = single.captures(division_name) {
        let age: i32 = caps[1].parse().ok()?;
        return Some(AgeGroup::single(age));
    }

    None
}
