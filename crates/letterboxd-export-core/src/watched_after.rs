use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid watched-after value '{0}', expected YYYY-MM-DD or Nd (e.g. 30d)")]
pub struct WatchedAfterParseError(String);

/// Lower bound on the last-watched time: an absolute date (midnight UTC)
/// or a duration before now, written `30d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchedAfter {
    Date(NaiveDate),
    DaysAgo(i64),
}

impl WatchedAfter {
    pub fn resolve(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            WatchedAfter::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
            WatchedAfter::DaysAgo(days) => now - Duration::days(days),
        }
    }
}

impl FromStr for WatchedAfter {
    type Err = WatchedAfterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(days) = s.strip_suffix('d') {
            if let Ok(days) = days.parse::<i64>() {
                if days >= 0 {
                    return Ok(WatchedAfter::DaysAgo(days));
                }
            }
            return Err(WatchedAfterParseError(s.to_string()));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(WatchedAfter::Date)
            .map_err(|_| WatchedAfterParseError(s.to_string()))
    }
}
