use regex::Regex;
use std::sync::OnceLock;

static TRAILING_FC: OnceLock<Regex> = OnceLock::new();
static TRAILING_SC: OnceLock<Regex> = OnceLock::new();

/// Produce the canonical form of a name used for identity keys and
/// similarity comparison: whitespace collapsed, lowercased, with a trailing
/// standalone "fc" or "sc" token stripped so "Rapids FC" and "Rapids"
/// normalize identically.
pub fn normalize_name(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<&str>>().join(" ");
    let lowered = collapsed.to_lowercase();

    let fc = TRAILING_FC.get_or_init(|| Regex::new(r"\s+fc\s*$").expect("static pattern"));
    let sc = TRAILING_SC.get_or_init(|| Regex::new(r"\s+sc\s*$").expect("static pattern"));

    let stripped = fc.replace(&lowered, "");
    let stripped = sc.replace(&stripped, "");

    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_lowercases() {
        assert_eq!(normalize_name("  Rapids   15B  Black "), "rapids 15b black");
    }

    #[test]
    fn test_strips_trailing_fc_and_sc() {
        assert_eq!(normalize_name("Rapids FC"), "rapids");
        assert_eq!(normalize_name("Northview SC"), "northview");
        assert_eq!(normalize_name("Rapids"), "rapids");
    }

    #[test]
    fn test_fc_in_the_middle_is_kept() {
        assert_eq!(normalize_name("PASS FC 2013B"), "pass fc 2013b");
    }

    #[test]
    fn test_equal_keys_for_suffix_variants() {
        assert_eq!(normalize_name("Rapids FC"), normalize_name("rapids"));
    }
}
