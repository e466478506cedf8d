use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::Address;
use crate::temporal::{now_millis, Timestamp};

const ID_SUFFIX_LEN: usize = 6;
const ID_MAX_LEN: usize = 128;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Client-generated record identifier.
///
/// New ids are `<unix millis>-<6 random base-36 chars>`. Ids are never
/// reused; the time component makes collisions between clients unlikely
/// and the random suffix covers clients creating in the same millisecond.
/// Ids written by older clients (e.g. `spell-1700000000000-x9k2`) are
/// accepted as long as they only use `[A-Za-z0-9._-]`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier from the current time.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("{}-{suffix}", now_millis()))
    }

    /// Validate and wrap an existing identifier.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let valid = !s.is_empty()
            && s.len() <= ID_MAX_LEN
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(TypeError::InvalidRecordId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl FromStr for RecordId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a record.
///
/// ```text
/// Prepared ──► Cast
///     │
///     └──────► Failed
/// ```
///
/// `Prepared` is the initial state; `Cast` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(alias = "prepared")]
    Prepared,
    #[serde(alias = "cast")]
    Cast,
    #[serde(alias = "failed")]
    Failed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Prepared, Status::Cast, Status::Failed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prepared => "Prepared",
            Self::Cast => "Cast",
            Self::Failed => "Failed",
        }
    }

    /// Returns `true` for states no transition leaves.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Prepared)
    }

    /// Returns `true` if `self -> target` is a legal lifecycle transition.
    pub fn can_transition_to(&self, target: Status) -> bool {
        matches!(
            (self, target),
            (Self::Prepared, Self::Cast) | (Self::Prepared, Self::Failed)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeError::UnknownStatus(s.to_string()))
    }
}

/// One encoded-value entry with its metadata.
///
/// `encoded_value` is derived from `declared_cost` once, at creation, and
/// never recomputed. Note that `declared_cost` is kept in clear next to it;
/// anyone who can read the ledger can read the value without revealing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub encoded_value: String,
    pub created_at: Timestamp,
    pub author: Address,
    pub category: String,
    pub declared_cost: f64,
    pub status: Status,
}

impl Record {
    /// Returns `true` if `caller` is the record's author (case-insensitive).
    pub fn is_authored_by(&self, caller: &Address) -> bool {
        &self.author == caller
    }

    /// Returns a copy with only the status replaced.
    pub fn with_status(&self, status: Status) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
