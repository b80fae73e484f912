//! Last-resort club-name extraction.
//!
//! Used only when structured parsing produced no club name: strip age/year
//! tokens, then take leading words until a known color/descriptor word is
//! hit. The structured parser in `team_name` is always preferred.

use regex::Regex;
use std::sync::OnceLock;

const DESCRIPTOR_WORDS: &[&str] = &[
    "black", "white", "green", "blue", "red", "yellow", "gold", "silver", "elite", "premier",
    "lobos", "rovers", "wolves", "eagles", "hawks",
];

static AGE_TOKEN: OnceLock<Regex> = OnceLock::new();
static SHORT_YEAR_GENDER: OnceLock<Regex> = OnceLock::new();
static FULL_YEAR_GENDER: OnceLock<Regex> = OnceLock::new();
static BARE_TWO_DIGIT: OnceLock<Regex> = OnceLock::new();

/// Extract a probable club name from a raw team name.
///
/// Examples:
/// - "Rapids FC 15B Black" -> "Rapids FC"
/// - "NUSC 15B Green" -> "NUSC"
/// - "Alliance FC 15 Lobos" -> "Alliance FC"
pub fn extract_club_name(team_name: &str) -> Option<String> {
    let age = AGE_TOKEN.get_or_init(|| Regex::new(r"\bU\d{1,2}\b").expect("static pattern"));
    let short =
        SHORT_YEAR_GENDER.get_or_init(|| Regex::new(r"\b\d{1,2}[BG]\b").expect("static pattern"));
    let full =
        FULL_YEAR_GENDER.get_or_init(|| Regex::new(r"\b\d{4}[BG]\b").expect("static pattern"));
    let bare = BARE_TWO_DIGIT.get_or_init(|| Regex::new(r"\b\d{2}\b").expect("static pattern"));

    let name = age.replace_all(team_name, "");
    let name = short.replace_all(&name, "");
    let name = full.replace_all(&name, "");
    let name = bare.replace_all(&name, "");

    let mut club_words: Vec<&str> = Vec::new();
    for word in name.split_whitespace() {
        if DESCRIPTOR_WORDS.contains(&word.to_lowercase().as_str()) {
            break;
        }
        club_words.push(word);
    }

    let club_name = club_words.join(" ").trim().to_string();
    if club_name.len() < 2 {
        return None;
    }

    Some(club_name)
}
