//! Core types and errors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors the engine can produce
///
/// Two kinds only: caller mistakes (validation) and failures talking to
/// the key-value store. There are no transactions to roll back, so no
/// richer taxonomy is needed.
#[derive(Debug, thiserror::Error)]
pub enum StokeError {
    /// Invalid input from the caller; no state was mutated
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure talking to the key-value store
    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, StokeError>;

/// Action types recognized by the engine
///
/// The string forms are the wire values existing callers send and the
/// values stored in history entries and dedup marker keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Subscriber opened the newsletter (+1 when first of the day)
    Open,
    /// Subscriber clicked a link (+2 when first of the day)
    Click,
    /// Click after today's click credit is exhausted; logged, never credited
    ClickNopoints,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Click => "click",
            Self::ClickNopoints => "click_nopoints",
        }
    }

    /// Points awarded on the first credited occurrence of the day
    pub fn delta(&self) -> u64 {
        match self {
            Self::Open => 1,
            Self::Click => 2,
            Self::ClickNopoints => 0,
        }
    }

    /// Whether this kind is subject to daily gating and crediting
    pub fn credits(&self) -> bool {
        self.delta() > 0
    }

    /// Whether this kind counts as a click for statistics
    pub fn is_click(&self) -> bool {
        matches!(self, Self::Click | Self::ClickNopoints)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = StokeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(Self::Open),
            "click" => Ok(Self::Click),
            "click_nopoints" => Ok(Self::ClickNopoints),
            other => Err(StokeError::Validation(format!(
                "unknown action type '{other}'"
            ))),
        }
    }
}

/// One interaction, as stored in a subscriber's history log
///
/// `timestamp` is milliseconds since epoch, kept as a string for
/// compatibility with the existing deployment's field map format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub timestamp: String,
    pub date: String,
    /// Action-specific fields (e.g. target URL for clicks)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HistoryEntry {
    /// Build an entry for the given calendar day, stamped with the current time
    pub fn new(
        kind: ActionKind,
        date: &str,
        extra: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            kind,
            timestamp: chrono::Utc::now().timestamp_millis().to_string(),
            date: date.to_string(),
            extra,
        }
    }

    /// Timestamp as an integer, if it parses
    pub fn timestamp_ms(&self) -> Option<i64> {
        self.timestamp.parse().ok()
    }
}

/// Read-side statistics for one subscriber
#[derive(Debug, Clone, Serialize)]
pub struct SubscriberStats {
    pub points: u64,
    /// 1-based leaderboard position; `None` if unranked
    pub position: Option<u64>,
    pub total_users: u64,
    /// "open" entries among the retained history
    pub total_opens: u64,
    /// Click entries among the retained history, credited or not
    pub total_clicks: u64,
    /// Timestamp (ms since epoch) of the most recent interaction
    pub last_activity: Option<i64>,
}

/// One row of a leaderboard page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingRow {
    pub position: u64,
    pub sub_id: String,
    pub points: u64,
}

/// A page of the leaderboard, descending by score
#[derive(Debug, Clone, Serialize)]
pub struct RankingPage {
    pub total_users: u64,
    pub rows: Vec<RankingRow>,
}

/// Outcome of one decay sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Subscribers processed successfully
    pub swept: u64,
    /// Subscribers whose score reached zero and left the ranking
    pub retired: u64,
    /// Subscribers skipped because of a store error
    pub failed: u64,
}
