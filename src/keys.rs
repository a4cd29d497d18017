//! Key-space conventions
//!
//! Key formats are reproduced bit-for-bit from the existing deployment so
//! the engine can run against live data.
//!
//! ```text
//! user:<sub_id>:points                    → string-encoded point total
//! user:<sub_id>:<action>:<YYYY-MM-DD>     → "1", expires after 48h
//! user:<sub_id>:history                   → list of JSON entries, newest first
//! user:ranking                            → sorted set, member = sub_id
//! ```

use chrono::NaiveDate;

use crate::types::ActionKind;

/// Global sorted set of all positive point totals
pub const RANKING_KEY: &str = "user:ranking";

/// Dedup marker lifetime: long enough to outlive the calendar day it
/// gates, short enough to bound storage (48 hours)
pub const DEDUP_TTL_SECS: u64 = 172_800;

/// Maximum retained history entries per subscriber; oldest evicted first
pub const HISTORY_MAX_LEN: usize = 100;

/// Points ledger key for a subscriber
pub fn points(sub_id: &str) -> String {
    format!("user:{sub_id}:points")
}

/// History log key for a subscriber
pub fn history(sub_id: &str) -> String {
    format!("user:{sub_id}:history")
}

/// Daily dedup marker key for a subscriber and action type
pub fn dedup(sub_id: &str, kind: ActionKind, day: &str) -> String {
    format!("user:{sub_id}:{}:{day}", kind.as_str())
}

/// Calendar-day string in the deployed `YYYY-MM-DD` format
pub fn day_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's calendar-day string, server-local
pub fn today() -> String {
    day_string(chrono::Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_formats() {
        assert_eq!(points("a@b.com"), "user:a@b.com:points");
        assert_eq!(history("a@b.com"), "user:a@b.com:history");
        assert_eq!(
            dedup("a@b.com", ActionKind::Open, "2026-08-23"),
            "user:a@b.com:open:2026-08-23"
        );
        assert_eq!(
            dedup("a@b.com", ActionKind::Click, "2026-08-23"),
            "user:a@b.com:click:2026-08-23"
        );
    }

    #[test]
    fn test_day_string_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(day_string(date), "2026-01-05");
    }
}
