//! Free-text identifier scanning.
//!
//! Commit messages, pull request bodies and comments reference tracker issues
//! as `TEAM-NUMBER` tokens. [`scan_identifiers`] finds them in a single piece
//! of text; [`IdentifierCollector`] accumulates them across many texts for one
//! team, keeping first-seen order.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::TeamKey;

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER_REGEX.get_or_init(|| {
        // Upper-case team key only: "mir-42" is prose, not a reference.
        // ASCII word boundaries, so "修正MIR-42を" still matches.
        Regex::new(r"(?-u:\b)[A-Z]+-[0-9]+(?-u:\b)").expect("identifier regex is valid")
    })
}

/// Extracts all issue identifiers from `text`.
///
/// Matches are whole words, returned in first-occurrence order with exact
/// duplicates removed. An empty vector means the text references nothing.
///
/// # Examples
///
/// ```
/// use issue_bridge::identifiers::scan_identifiers;
///
/// assert_eq!(scan_identifiers("Fixed MIR-42 in latest commit"), vec!["MIR-42"]);
/// assert_eq!(scan_identifiers("MIR-42 is the same as MIR-42"), vec!["MIR-42"]);
/// assert!(scan_identifiers("mir-42 should not match").is_empty());
/// ```
pub fn scan_identifiers(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    identifier_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|m| seen.insert(*m))
        .map(str::to_string)
        .collect()
}

/// Order-preserving, deduplicating accumulator of one team's identifiers.
#[derive(Debug, Clone)]
pub struct IdentifierCollector {
    team_key: TeamKey,
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl IdentifierCollector {
    pub fn new(team_key: TeamKey) -> Self {
        Self {
            team_key,
            seen: HashSet::new(),
            ordered: Vec::new(),
        }
    }

    /// Scans `text` and records every identifier owned by the team that has
    /// not been seen before. Returns how many new identifiers were recorded.
    pub fn collect(&mut self, text: &str) -> usize {
        let before = self.ordered.len();
        for id in scan_identifiers(text) {
            if self.team_key.owns(&id) && !self.seen.contains(&id) {
                self.seen.insert(id.clone());
                self.ordered.push(id);
            }
        }
        self.ordered.len() - before
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn identifiers(&self) -> &[String] {
        &self.ordered
    }

    pub fn into_identifiers(self) -> Vec<String> {
        self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn finds_single_identifier() {
        assert_eq!(scan_identifiers("Fixed MIR-42 in latest commit"), ["MIR-42"]);
    }

    #[test]
    fn matches_next_to_non_ascii_letters() {
        assert_eq!(scan_identifiers("修正MIR-42を対応"), ["MIR-42"]);
        assert_eq!(scan_identifiers("véMIR-7 and MIR-8é"), ["MIR-7", "MIR-8"]);
    }

    #[test]
    fn ascii_letters_still_bound_the_match() {
        assert!(scan_identifiers("xMIR-42").is_empty());
        assert!(scan_identifiers("MIR-42x").is_empty());
    }

    #[test]
    fn deduplicates_repeats() {
        assert_eq!(scan_identifiers("MIR-42 is the same as MIR-42"), ["MIR-42"]);
    }

    #[test]
    fn lower_case_does_not_match() {
        assert!(scan_identifiers("mir-42 should not match").is_empty());
    }

    #[test]
    fn preserves_first_occurrence_order() {
        assert_eq!(scan_identifiers("ABC-1 and DEF-99"), ["ABC-1", "DEF-99"]);
        assert_eq!(
            scan_identifiers("DEF-99, then ABC-1, then DEF-99 again"),
            ["DEF-99", "ABC-1"]
        );
    }

    #[test]
    fn requires_word_boundaries() {
        assert!(scan_identifiers("xMIR-42").is_empty());
        assert!(scan_identifiers("MIR-42abc").is_empty());
        assert!(scan_identifiers("MIR-").is_empty());
        assert!(scan_identifiers("-42").is_empty());
    }

    #[test]
    fn matches_inside_punctuation() {
        assert_eq!(
            scan_identifiers("(MIR-1) [MIR-2]: fixes MIR-3."),
            ["MIR-1", "MIR-2", "MIR-3"]
        );
    }

    #[test]
    fn matches_across_lines() {
        assert_eq!(scan_identifiers("MIR-1\n\nbody MIR-2\n"), ["MIR-1", "MIR-2"]);
    }

    #[test]
    fn empty_text_has_no_identifiers() {
        assert!(scan_identifiers("").is_empty());
    }

    #[test]
    fn collector_filters_by_team_and_keeps_order() {
        let mut collector = IdentifierCollector::new(TeamKey::new("mir"));

        assert_eq!(collector.collect("MIR-10: first"), 1);
        assert_eq!(collector.collect("ABC-1 and MIR-11"), 1);
        assert_eq!(collector.collect("unrelated"), 0);
        assert_eq!(collector.collect("also MIR-10 again"), 0);

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.into_identifiers(), ["MIR-10", "MIR-11"]);
    }

    #[test]
    fn collector_rejects_longer_team_keys_sharing_a_prefix() {
        let mut collector = IdentifierCollector::new(TeamKey::new("MIR"));
        collector.collect("MIRROR-1 MIR-2");
        assert_eq!(collector.identifiers(), ["MIR-2"]);
    }

    proptest! {
        #[test]
        fn scan_never_returns_duplicates(text in "[A-Z0-9 -]{0,200}") {
            let ids = scan_identifiers(&text);
            let unique: HashSet<_> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());
        }

        #[test]
        fn every_match_parses_as_identifier(
            text in "([A-Za-z]{1,3}-[0-9]{1,6}|[a-z .,-]{1,5}){0,30}"
        ) {
            for id in scan_identifiers(&text) {
                prop_assert!(crate::types::Identifier::parse(&id).is_ok());
            }
        }

        #[test]
        fn embedded_identifier_is_found(
            team in "[A-Z]{1,5}",
            n in 0u32..100_000,
            before in "[a-z ]{0,20}",
            after in "[a-z ]{0,20}",
        ) {
            let id = format!("{}-{}", team, n);
            let text = format!("{} {} {}", before, id, after);
            prop_assert!(scan_identifiers(&text).contains(&id));
        }
    }
}
