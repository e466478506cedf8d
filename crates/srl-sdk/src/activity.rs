use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;
use srl_types::{RecordId, Timestamp};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Create,
    Cast,
    Fail,
    Reveal,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Cast => "cast",
            Self::Fail => "fail",
            Self::Reveal => "reveal",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Cancelled,
    Failed(String),
}

/// One operation performed by this client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub at: Timestamp,
    pub kind: ActivityKind,
    pub id: RecordId,
    pub outcome: Outcome,
}

/// Bounded, in-memory history of this session's operations. Oldest
/// entries are dropped first.
#[derive(Clone, Debug)]
pub struct ActivityLog {
    entries: VecDeque<Activity>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(256)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, activity: Activity) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(activity);
    }

    /// Entries newest first.
    pub fn recent(&self) -> Vec<Activity> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
