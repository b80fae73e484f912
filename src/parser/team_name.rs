//! Natural-language parsing of raw team names.
//!
//! Handles patterns like:
//! - "2013B" -> birth_year=2013, gender=Boys
//! - "PASS FC 2013B - White" -> club="PASS FC", birth_year=2013,
//!   gender=Boys, designation="White"
//! - "CATS FC '04 BLACK" -> club="CATS FC", birth_year=2004,
//!   designation="BLACK" (no gender keyword present)

use crate::models::Gender;
use regex::Regex;

/// Structured attributes extracted from a raw team name.
///
/// A name that matches none of the patterns yields `parsed = false` with
/// all fields unset; that is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ParsedTeamName {
    pub original_name: String,
    pub club_name: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<Gender>,
    pub designation: Option<String>,
    pub parsed: bool,
}

impl ParsedTeamName {
    fn unparsed(original: &str) -> Self {
        Self {
            original_name: original.trim().to_string(),
            club_name: None,
            birth_year: None,
            gender: None,
            designation: None,
            parsed: false,
        }
    }
}

/// Parser for raw team-name strings.
///
/// Patterns are tried in strict priority order; the first match wins:
/// 1. apostrophe two-digit year + gender letter ("'04B")
/// 2. four-digit year + gender letter ("2013B")
/// 3. apostrophe two-digit year, gender inferred from keywords ("'04 BLACK")
/// 4. bare four-digit year in 2000-2039, gender inferred from keywords
pub struct TeamNameParser {
    apostrophe_gender: Regex,
    year_gender: Regex,
    apostrophe_no_gender: Regex,
    year_only: Regex,
}

impl TeamNameParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            apostrophe_gender: Regex::new(r"(?i)'(\d{2})([BG])\b")?,
            year_gender: Regex::new(r"(?i)(\d{4})([BG])\b")?,
            apostrophe_no_gender: Regex::new(r"'(\d{2})\b")?,
            year_only: Regex::new(r"\b(20[0-3]\d)\b")?,
        })
    }

    pub fn parse(&self, team_name: &str) -> ParsedTeamName {
        let name = team_name.trim();
        if name.is_empty() {
            return ParsedTeamName::unparsed(team_name);
        }

        // Pattern 1: two-digit year with apostrophe and gender letter
        if let Some(caps) = self.apostrophe_gender.captures(name) {
            let two_digit: i32 = caps[1].parse().unwrap_or(0);
            let birth_year = infer_century(two_digit);
            let gender = Gender::parse(&caps[2]);
            let m = caps.get(0).expect("whole match");
            return build_parsed(name, m.start(), m.end(), birth_year, gender);
        }

        // Pattern 2: four-digit year followed by gender letter
        if let Some(caps) = self.year_gender.captures(name) {
            let birth_year: i32 = caps[1].parse().unwrap_or(0);
            let gender = Gender::parse(&caps[2]);
            let m = caps.get(0).expect("whole match");
            return build_parsed(name, m.start(), m.end(), birth_year, gender);
        }

        // Pattern 3: two-digit year with apostrophe but no gender letter;
        // gender only if a boys/girls keyword appears elsewhere in the name
        if let Some(caps) = self.apostrophe_no_gender.captures(name) {
            let two_digit: i32 = caps[1].parse().unwrap_or(0);
            let birth_year = infer_century(two_digit);
            let gender = infer_gender_from_context(name);
            let m = caps.get(0).expect("whole match");
            return build_parsed(name, m.start(), m.end(), birth_year, gender);
        }

        // Pattern 4: bare four-digit year in the plausible birth-year range
        if let Some(caps) = self.year_only.captures(name) {
            let birth_year: i32 = caps[1].parse().unwrap_or(0);
            let gender = infer_gender_from_context(name);
            let m = caps.get(0).expect("whole match");
            return build_parsed(name, m.start(), m.end(), birth_year, gender);
        }

        ParsedTeamName::unparsed(name)
    }
}

/// Two-digit years at or below 30 are 2000s, anything above is 1900s.
/// Handles legacy birth years like '98.
fn infer_century(two_digit: i32) -> i32 {
    if two_digit <= 30 {
        2000 + two_digit
    } else {
        1900 + two_digit
    }
}

fn infer_gender_from_context(name: &str) -> Option<Gender> {
    let lower = name.to_lowercase();
    if lower.contains("boys") || lower.contains(" boy") {
        Some(Gender::Boys)
    } else if lower.contains("girls") || lower.contains(" girl") {
        Some(Gender::Girls)
    } else {
        None
    }
}

fn build_parsed(
    name: &str,
    span_start: usize,
    span_end: usize,
    birth_year: i32,
    gender: Option<Gender>,
) -> ParsedTeamName {
    ParsedTeamName {
        original_name: name.to_string(),
        club_name: clean_club_part(&name[..span_start]),
        birth_year: Some(birth_year),
        gender,
        designation: clean_designation_part(&name[span_end..]),
        parsed: true,
    }
}

/// Text before the year/gender span, whitespace-collapsed and trimmed of
/// leading/trailing hyphens.
fn clean_club_part(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<&str>>().join(" ");
    let cleaned = collapsed.trim_matches(|c| c == ' ' || c == '-').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Text after the year/gender span with the leading separator stripped.
fn clean_designation_part(raw: &str) -> Option<String> {
    let cleaned = raw
        .trim_start_matches(|c: char| c == '-' || c.is_whitespace())
        .trim()
        .to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TeamNameParser {
        TeamNameParser::new().unwrap()
    }

    #[test]
    fn test_bare_year_gender_token() {
        let parsed = parser().parse("2013B");
        assert_eq!(parsed.birth_year, Some(2013));
        assert_eq!(parsed.gender, Some(Gender::Boys));
        assert_eq!(parsed.club_name, None);
        assert_eq!(parsed.designation, None);
        assert!(parsed.parsed);
    }

    #[test]
    fn test_full_name_with_club_and_designation() {
        let parsed = parser().parse("PASS FC 2013B - White");
        assert_eq!(parsed.club_name.as_deref(), Some("PASS FC"));
        assert_eq!(parsed.birth_year, Some(2013));
        assert_eq!(parsed.gender, Some(Gender::Boys));
        assert_eq!(parsed.designation.as_deref(), Some("White"));
    }

    #[test]
    fn test_apostrophe_year_without_gender_letter() {
        let parsed = parser().parse("CATS FC '04 BLACK");
        assert_eq!(parsed.birth_year, Some(2004));
        assert_eq!(parsed.club_name.as_deref(), Some("CATS FC"));
        assert_eq!(parsed.designation.as_deref(), Some("BLACK"));
        // No boys/girls keyword anywhere in the name
        assert_eq!(parsed.gender, None);
    }

    #[test]
    fn test_apostrophe_year_with_gender_letter() {
        let parsed = parser().parse("Aguilas '04B Rovers");
        assert_eq!(parsed.birth_year, Some(2004));
        assert_eq!(parsed.gender, Some(Gender::Boys));
        assert_eq!(parsed.club_name.as_deref(), Some("Aguilas"));
        assert_eq!(parsed.designation.as_deref(), Some("Rovers"));
    }

    #[test]
    fn test_legacy_two_digit_year_century() {
        let parsed = parser().parse("Classics '98G");
        assert_eq!(parsed.birth_year, Some(1998));
        assert_eq!(parsed.gender, Some(Gender::Girls));
    }

    #[test]
    fn test_gender_inferred_from_keyword() {
        let parsed = parser().parse("Holland Rovers 2010 Girls");
        assert_eq!(parsed.birth_year, Some(2010));
        assert_eq!(parsed.gender, Some(Gender::Girls));
        assert_eq!(parsed.club_name.as_deref(), Some("Holland Rovers"));
    }

    #[test]
    fn test_lowercase_gender_letter() {
        let parsed = parser().parse("2010g");
        assert_eq!(parsed.birth_year, Some(2010));
        assert_eq!(parsed.gender, Some(Gender::Girls));
    }

    #[test]
    fn test_year_outside_plausible_range_is_unparsed() {
        let parsed = parser().parse("Est. 1974 Select");
        assert!(!parsed.parsed);
        assert_eq!(parsed.birth_year, None);
    }

    #[test]
    fn test_no_pattern_is_a_normal_outcome() {
        let parsed = parser().parse("Thunder");
        assert!(!parsed.parsed);
        assert_eq!(parsed.club_name, None);
        assert_eq!(parsed.gender, None);
    }

    #[test]
    fn test_empty_string() {
        let parsed = parser().parse("   ");
        assert!(!parsed.parsed);
    }

    #[test]
    fn test_hyphen_separator_before_year() {
        let parsed = parser().parse("Strikers - 2012G");
        assert_eq!(parsed.club_name.as_deref(), Some("Strikers"));
        assert_eq!(parsed.gender, Some(Gender::Girls));
    }
}
