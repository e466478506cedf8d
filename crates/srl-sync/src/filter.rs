use std::fmt;
use std::str::FromStr;

use srl_types::{Record, Status};

use crate::error::SyncError;

/// Status constraint of a query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFacet {
    #[default]
    All,
    Only(Status),
}

impl StatusFacet {
    pub fn matches(&self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFacet {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Status>()
            .map(Self::Only)
            .map_err(|_| SyncError::UnknownFacet(s.to_string()))
    }
}

impl fmt::Display for StatusFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => write!(f, "{}", status.as_str().to_ascii_lowercase()),
        }
    }
}

/// Records whose category or author contains `query` (case-insensitive)
/// and whose status passes `facet`. An empty query matches everything;
/// whitespace in the query is matched literally.
pub fn filter<'a>(records: &'a [Record], query: &str, facet: StatusFacet) -> Vec<&'a Record> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| facet.matches(r.status))
        .filter(|r| {
            needle.is_empty()
                || r.category.to_lowercase().contains(&needle)
                || r.author.contains_ignore_case(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use srl_types::{Address, RecordId, Timestamp};

    fn record(id: &str, category: &str, author: &str, status: Status) -> Record {
        Record {
            id: RecordId::parse(id).unwrap(),
            encoded_value: "FHE-MQ==".into(),
            created_at: Timestamp::from_secs(1),
            author: Address::new(author).unwrap(),
            category: category.into(),
            declared_cost: 1.0,
            status,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record("1", "Fireball", "0xAAAA", Status::Prepared),
            record("2", "Frostbolt", "0xBBBB", Status::Cast),
            record("3", "fireball", "0xCCCC", Status::Cast),
            record("4", "Healing", "0xFIREFLY", Status::Failed),
        ]
    }

    fn ids(found: Vec<&Record>) -> Vec<&str> {
        found.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn category_match_ignores_case() {
        let records = sample();
        assert_eq!(ids(filter(&records, "Fireball", StatusFacet::All)), vec!["1", "3"]);
    }

    #[test]
    fn surrounding_whitespace_is_part_of_the_query() {
        let records = sample();
        assert!(filter(&records, " Fireball", StatusFacet::All).is_empty());
        assert!(filter(&records, "Fireball ", StatusFacet::All).is_empty());
        assert!(filter(&records, "  ", StatusFacet::All).is_empty());
    }

    #[test]
    fn empty_query_with_status_facet() {
        let records = sample();
        assert_eq!(
            ids(filter(&records, "", StatusFacet::Only(Status::Cast))),
            vec!["2", "3"]
        );
    }

    #[test]
    fn query_and_facet_are_combined() {
        let records = sample();
        assert_eq!(
            ids(filter(&records, "fire", StatusFacet::Only(Status::Cast))),
            vec!["3"]
        );
    }

    #[test]
    fn query_matches_author() {
        let records = sample();
        assert_eq!(ids(filter(&records, "0xbb", StatusFacet::All)), vec!["2"]);
        assert_eq!(ids(filter(&records, "fire", StatusFacet::All)), vec!["1", "3", "4"]);
    }

    #[test]
    fn empty_query_all_returns_everything() {
        let records = sample();
        assert_eq!(filter(&records, "", StatusFacet::All).len(), 4);
    }

    #[test]
    fn facet_parses_case_insensitively() {
        assert_eq!("ALL".parse::<StatusFacet>().unwrap(), StatusFacet::All);
        assert_eq!(
            "cast".parse::<StatusFacet>().unwrap(),
            StatusFacet::Only(Status::Cast)
        );
        assert_eq!(
            " Failed ".parse::<StatusFacet>().unwrap(),
            StatusFacet::Only(Status::Failed)
        );
        assert!("exploded".parse::<StatusFacet>().is_err());
    }

    #[test]
    fn facet_display_parses_back() {
        for facet in [StatusFacet::All, StatusFacet::Only(Status::Prepared)] {
            assert_eq!(facet.to_string().parse::<StatusFacet>().unwrap(), facet);
        }
    }
}
