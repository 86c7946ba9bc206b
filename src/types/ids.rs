//! Newtype wrappers for domain identifiers.
//!
//! These types keep tracker identifiers, team keys and repository coordinates
//! from being mixed up as bare strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The input has no `-` separating the team key from the number.
    #[error("invalid identifier format: {0}")]
    MissingSeparator(String),

    /// The team key before the `-` is empty.
    #[error("empty team key in identifier: {0}")]
    EmptyTeamKey(String),

    /// The part after the `-` is not a non-negative integer.
    #[error("invalid issue number in {0}")]
    InvalidNumber(String),

    /// A repository slug was not in `owner/repo` form.
    #[error("invalid repo format {0:?}, want owner/repo")]
    InvalidRepo(String),
}

/// A tracker issue identifier such as `MIR-42`.
///
/// The team key is everything before the first `-`; the number is parsed from
/// the remainder. Parsing preserves the team key's case; callers upper-case at
/// the boundary before looking an identifier up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    team_key: String,
    number: u64,
}

impl Identifier {
    /// Parses `TEAM-NUMBER`.
    ///
    /// # Examples
    ///
    /// ```
    /// use issue_bridge::types::Identifier;
    ///
    /// let id = Identifier::parse("MIR-42").unwrap();
    /// assert_eq!(id.team_key(), "MIR");
    /// assert_eq!(id.number(), 42);
    ///
    /// assert!(Identifier::parse("NOSPACE").is_err());
    /// assert!(Identifier::parse("MIR-abc").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        let (team_key, number) = s
            .split_once('-')
            .ok_or_else(|| IdentifierError::MissingSeparator(s.to_string()))?;
        if team_key.is_empty() {
            return Err(IdentifierError::EmptyTeamKey(s.to_string()));
        }
        let number = number
            .parse::<u64>()
            .map_err(|_| IdentifierError::InvalidNumber(s.to_string()))?;
        Ok(Identifier {
            team_key: team_key.to_string(),
            number,
        })
    }

    /// Returns the team key portion (e.g. `MIR`).
    pub fn team_key(&self) -> &str {
        &self.team_key
    }

    /// Returns the issue number within the team.
    pub fn number(&self) -> u64 {
        self.number
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team_key, self.number)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identifier::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Identifier::parse(&s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

/// A team key, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamKey(String);

impl TeamKey {
    /// Creates a team key, upper-casing the input.
    pub fn new(s: impl AsRef<str>) -> Self {
        TeamKey(s.as_ref().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The prefix every identifier of this team starts with (`MIR-`).
    pub fn prefix(&self) -> String {
        format!("{}-", self.0)
    }

    /// Returns true if `identifier` belongs to this team.
    pub fn owns(&self, identifier: &str) -> bool {
        identifier
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository identifier (owner/repo format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepoId {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses an `owner/repo` slug.
    pub fn parse(slug: &str) -> Result<Self, IdentifierError> {
        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok(RepoId::new(owner, repo))
            }
            _ => Err(IdentifierError::InvalidRepo(slug.to_string())),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod identifier {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn parses_valid_identifiers() {
            let cases = [("MIR-42", "MIR", 42), ("ABC-1", "ABC", 1), ("MIR-0", "MIR", 0)];
            for (input, team, number) in cases {
                let id = Identifier::parse(input).unwrap();
                assert_eq!(id.team_key(), team);
                assert_eq!(id.number(), number);
            }
        }

        #[test]
        fn rejects_missing_separator() {
            assert_eq!(
                Identifier::parse("NOSPACE"),
                Err(IdentifierError::MissingSeparator("NOSPACE".into()))
            );
        }

        #[test]
        fn rejects_non_numeric_number() {
            assert_eq!(
                Identifier::parse("MIR-abc"),
                Err(IdentifierError::InvalidNumber("MIR-abc".into()))
            );
        }

        #[test]
        fn rejects_negative_number() {
            assert!(Identifier::parse("MIR--1").is_err());
        }

        #[test]
        fn rejects_empty_team_key() {
            assert_eq!(
                Identifier::parse("-42"),
                Err(IdentifierError::EmptyTeamKey("-42".into()))
            );
        }

        #[test]
        fn splits_on_first_hyphen() {
            // "A-B-1": team key "A", remainder "B-1" is not a number.
            assert!(Identifier::parse("A-B-1").is_err());
        }

        proptest! {
            #[test]
            fn display_matches_input(team in "[A-Z]{1,6}", n: u64) {
                let input = format!("{}-{}", team, n);
                let id = Identifier::parse(&input).unwrap();
                prop_assert_eq!(id.to_string(), input);
            }

            #[test]
            fn serde_roundtrip(team in "[A-Z]{1,6}", n: u64) {
                let id = Identifier::parse(&format!("{}-{}", team, n)).unwrap();
                let json = serde_json::to_string(&id).unwrap();
                let parsed: Identifier = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(id, parsed);
            }
        }
    }

    mod team_key {
        use super::*;

        #[test]
        fn normalizes_to_upper_case() {
            let key = TeamKey::new("mir");
            assert_eq!(key.as_str(), "MIR");
            assert_eq!(key.prefix(), "MIR-");
        }

        #[test]
        fn owns_only_its_own_prefix() {
            let key = TeamKey::new("MIR");
            assert!(key.owns("MIR-42"));
            assert!(!key.owns("ABC-1"));
            assert!(!key.owns("MIRROR-1"));
            assert!(!key.owns("MIR"));
        }
    }

    mod repo_id {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn parse_rejects_bad_slugs() {
            assert!(RepoId::parse("noslash").is_err());
            assert!(RepoId::parse("/repo").is_err());
            assert!(RepoId::parse("owner/").is_err());
        }

        proptest! {
            #[test]
            fn display_format(
                owner in "[a-zA-Z][a-zA-Z0-9-]{0,38}",
                repo in "[a-zA-Z][a-zA-Z0-9_-]{0,99}"
            ) {
                let id = RepoId::new(&owner, &repo);
                prop_assert_eq!(format!("{}", id), format!("{}/{}", owner, repo));
            }

            #[test]
            fn parse_display_roundtrip(
                owner in "[a-zA-Z][a-zA-Z0-9-]{0,38}",
                repo in "[a-zA-Z][a-zA-Z0-9_-]{0,99}"
            ) {
                let id = RepoId::new(&owner, &repo);
                prop_assert_eq!(RepoId::parse(&id.to_string()).unwrap(), id);
            }
        }
    }
}
