//! Calendar bucketing of play events
//!
//! Groups events by a derived time unit. Events with invalid timestamps
//! cannot be bucketed; they are excluded AND the exclusion count travels with
//! the result, so no report can lose rows without saying so.

use crate::types::PlayEvent;
use chrono::{Datelike, NaiveDate, Timelike};
use std::collections::BTreeMap;
use std::fmt;

/// Time unit to bucket by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Hour of day, 0-23, across all dates
    HourOfDay,
    /// Calendar day
    Day,
    /// Calendar month
    Month,
    /// Calendar year
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::HourOfDay => "hour_of_day",
            Granularity::Day => "day",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

/// A bucket key for one granularity.
///
/// Variants order among themselves chronologically; a single bucketing run
/// only ever produces one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeKey {
    Hour(u32),
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeKey::Hour(h) => write!(f, "{:02}:00", h),
            TimeKey::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TimeKey::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            TimeKey::Year(y) => write!(f, "{}", y),
        }
    }
}

/// One time bucket of events.
#[derive(Debug)]
pub struct TimeBucket<'a> {
    pub key: TimeKey,
    pub events: Vec<&'a PlayEvent>,
}

/// Bucketed events plus the count of events that could not be placed.
#[derive(Debug)]
pub struct TimeBuckets<'a> {
    pub granularity: Granularity,
    /// Buckets in chronological key order
    pub buckets: Vec<TimeBucket<'a>>,
    /// Events excluded because their timestamp is invalid
    pub invalid_timestamps: usize,
}

impl<'a> TimeBuckets<'a> {
    /// Total events across all buckets.
    pub fn bucketed_events(&self) -> usize {
        self.buckets.iter().map(|b| b.events.len()).sum()
    }
}

/// Bucket events by the given granularity.
pub fn bucket_by_time(events: &[PlayEvent], granularity: Granularity) -> TimeBuckets<'_> {
    let mut map: BTreeMap<TimeKey, Vec<&PlayEvent>> = BTreeMap::new();
    let mut invalid_timestamps = 0usize;

    for event in events {
        let at = match event.played_at.valid() {
            Some(at) => at,
            None => {
                invalid_timestamps += 1;
                continue;
            }
        };

        let key = match granularity {
            Granularity::HourOfDay => TimeKey::Hour(at.hour()),
            Granularity::Day => TimeKey::Day(at.date()),
            Granularity::Month => TimeKey::Month {
                year: at.year(),
                month: at.month(),
            },
            Granularity::Year => TimeKey::Year(at.year()),
        };
        map.entry(key).or_default().push(event);
    }

    TimeBuckets {
        granularity,
        buckets: map
            .into_iter()
            .map(|(key, events)| TimeBucket { key, events })
            .collect(),
        invalid_timestamps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayedAt;

    fn event_at(ts: Option<(i32, u32, u32, u32, u32)>) -> PlayEvent {
        let played_at = match ts {
            Some((y, mo, d, h, mi)) => PlayedAt::Valid {
                at: NaiveDate::from_ymd_opt(y, mo, d)
                    .unwrap()
                    .and_hms_opt(h, mi, 0)
                    .unwrap(),
            },
            None => PlayedAt::Invalid {
                raw: "garbage".to_string(),
            },
        };
        PlayEvent {
            track_uri: "spotify:track:abc".to_string(),
            played_at,
            platform: "android".to_string(),
            ms_played: 1000,
            track_duration_secs: 30,
            track_name: "Song".to_string(),
            artist_name: "Band".to_string(),
            album_name: "Album".to_string(),
            reason_start: "clickrow".to_string(),
            reason_end: "trackdone".to_string(),
            shuffle: false,
            skipped: false,
        }
    }

    #[test]
    fn test_bucket_by_hour() {
        let events = vec![
            event_at(Some((2025, 5, 14, 23, 10))),
            event_at(Some((2025, 5, 15, 23, 40))),
            event_at(Some((2025, 5, 15, 8, 0))),
        ];
        let buckets = bucket_by_time(&events, Granularity::HourOfDay);
        assert_eq!(buckets.buckets.len(), 2);
        assert_eq!(buckets.buckets[0].key, TimeKey::Hour(8));
        assert_eq!(buckets.buckets[1].key, TimeKey::Hour(23));
        assert_eq!(buckets.buckets[1].events.len(), 2);
        assert_eq!(buckets.invalid_timestamps, 0);
    }

    #[test]
    fn test_invalid_timestamps_counted() {
        let events = vec![
            event_at(Some((2025, 5, 14, 23, 10))),
            event_at(None),
            event_at(None),
        ];
        for granularity in [
            Granularity::HourOfDay,
            Granularity::Day,
            Granularity::Month,
            Granularity::Year,
        ] {
            let buckets = bucket_by_time(&events, granularity);
            assert_eq!(buckets.invalid_timestamps, 2);
            assert_eq!(buckets.bucketed_events(), 1);
        }
    }

    #[test]
    fn test_month_and_year_keys() {
        let events = vec![
            event_at(Some((2024, 12, 31, 10, 0))),
            event_at(Some((2025, 1, 1, 10, 0))),
            event_at(Some((2025, 1, 20, 10, 0))),
        ];
        let months = bucket_by_time(&events, Granularity::Month);
        let keys: Vec<String> = months.buckets.iter().map(|b| b.key.to_string()).collect();
        assert_eq!(keys, vec!["2024-12", "2025-01"]);
        assert_eq!(months.buckets[1].events.len(), 2);

        let years = bucket_by_time(&events, Granularity::Year);
        let keys: Vec<String> = years.buckets.iter().map(|b| b.key.to_string()).collect();
        assert_eq!(keys, vec!["2024", "2025"]);
    }

    #[test]
    fn test_empty_input() {
        let buckets = bucket_by_time(&[], Granularity::Day);
        assert!(buckets.buckets.is_empty());
        assert_eq!(buckets.invalid_timestamps, 0);
    }
}
