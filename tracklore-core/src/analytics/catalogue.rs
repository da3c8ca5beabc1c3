//! Report catalogue
//!
//! The fixed set of named reports over a batch of play events. Each report is
//! a pure function `(&[PlayEvent], &ReportOptions) -> Report`, expressed as a
//! thin composition of the aggregation primitives so rounding, tie-breaking
//! and invalid-timestamp handling are defined in exactly one place.
//!
//! Reports never mutate shared state and never fail: empty input produces an
//! empty (or zeroed) table.

use super::aggregate::{
    avg_ms, count, count_where, distinct, group_by, percent_of_total, percent_played, round_to,
    sum_ms, top_n, Group, Percent,
};
use super::report::{Cell, Report, ReportOptions};
use super::time::{bucket_by_time, Granularity, TimeKey};
use crate::types::PlayEvent;

fn refs(events: &[PlayEvent]) -> Vec<&PlayEvent> {
    events.iter().collect()
}

fn minutes(ms: u64) -> f64 {
    round_to(ms as f64 / 60_000.0, 1)
}

// ============================================
// Totals
// ============================================

/// Total number of play events.
pub fn total_plays(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    Report::new(
        "total_plays",
        "Total plays",
        &["plays"],
        vec![vec![Cell::from(events.len() as u64)]],
    )
}

/// Distinct track, artist and album counts.
pub fn unique_counts(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    let all = refs(events);
    Report::new(
        "unique_counts",
        "Unique tracks, artists and albums",
        &["unique_tracks", "unique_artists", "unique_albums"],
        vec![vec![
            Cell::from(distinct(&all, |e| e.track_key())),
            Cell::from(distinct(&all, |e| e.artist_name.clone())),
            Cell::from(distinct(&all, |e| (e.album_name.clone(), e.artist_name.clone()))),
        ]],
    )
}

/// Tally of events whose timestamp did not parse.
pub fn invalid_timestamps(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    let invalid = events.iter().filter(|e| !e.played_at.is_valid()).count();
    Report::new(
        "invalid_timestamps",
        "Events with invalid timestamps",
        &["invalid_timestamps", "total_events"],
        vec![vec![Cell::from(invalid as u64), Cell::from(events.len() as u64)]],
    )
}

// ============================================
// Rankings
// ============================================

fn ranked_rows<'a, K, M, R>(
    groups: Vec<Group<'a, K>>,
    metric: M,
    n: usize,
    to_row: R,
) -> Vec<Vec<Cell>>
where
    K: Ord,
    M: Fn(&Group<'a, K>) -> f64,
    R: Fn(&Group<'a, K>) -> Vec<Cell>,
{
    top_n(groups, &metric, n).iter().map(to_row).collect()
}

/// Most-played tracks by play count.
pub fn top_tracks_by_plays(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let groups = group_by(events, |e| e.track_key());
    let rows = ranked_rows(
        groups,
        |g| count(&g.events) as f64,
        opts.top_n,
        |g| {
            vec![
                Cell::text(&g.key.0),
                Cell::text(&g.key.1),
                Cell::from(count(&g.events)),
            ]
        },
    );
    Report::new(
        "top_tracks_by_plays",
        "Top tracks by play count",
        &["track", "artist", "plays"],
        rows,
    )
}

/// Most-played tracks by cumulative play time.
pub fn top_tracks_by_playtime(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let groups = group_by(events, |e| e.track_key());
    let rows = ranked_rows(
        groups,
        |g| sum_ms(&g.events) as f64,
        opts.top_n,
        |g| {
            vec![
                Cell::text(&g.key.0),
                Cell::text(&g.key.1),
                Cell::Float(minutes(sum_ms(&g.events))),
            ]
        },
    );
    Report::new(
        "top_tracks_by_playtime",
        "Top tracks by play time",
        &["track", "artist", "minutes_played"],
        rows,
    )
}

/// Most-played artists by play count.
pub fn top_artists_by_plays(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let groups = group_by(events, |e| e.artist_name.clone());
    let rows = ranked_rows(
        groups,
        |g| count(&g.events) as f64,
        opts.top_n,
        |g| vec![Cell::text(&g.key), Cell::from(count(&g.events))],
    );
    Report::new(
        "top_artists_by_plays",
        "Top artists by play count",
        &["artist", "plays"],
        rows,
    )
}

/// Most-played artists by cumulative play time.
pub fn top_artists_by_playtime(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let groups = group_by(events, |e| e.artist_name.clone());
    let rows = ranked_rows(
        groups,
        |g| sum_ms(&g.events) as f64,
        opts.top_n,
        |g| vec![Cell::text(&g.key), Cell::Float(minutes(sum_ms(&g.events)))],
    );
    Report::new(
        "top_artists_by_playtime",
        "Top artists by play time",
        &["artist", "minutes_played"],
        rows,
    )
}

/// Most-played albums by cumulative play time.
pub fn top_albums_by_playtime(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let groups = group_by(events, |e| (e.album_name.clone(), e.artist_name.clone()));
    let rows = ranked_rows(
        groups,
        |g| sum_ms(&g.events) as f64,
        opts.top_n,
        |g| {
            vec![
                Cell::text(&g.key.0),
                Cell::text(&g.key.1),
                Cell::Float(minutes(sum_ms(&g.events))),
            ]
        },
    );
    Report::new(
        "top_albums_by_playtime",
        "Top albums by play time",
        &["album", "artist", "minutes_played"],
        rows,
    )
}

/// Tracks played more often than the repeat threshold.
pub fn repeat_listens(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let groups: Vec<_> = group_by(events, |e| e.track_key())
        .into_iter()
        .filter(|g| count(&g.events) > opts.repeat_threshold)
        .collect();
    let rows = ranked_rows(
        groups,
        |g| count(&g.events) as f64,
        usize::MAX,
        |g| {
            vec![
                Cell::text(&g.key.0),
                Cell::text(&g.key.1),
                Cell::from(count(&g.events)),
            ]
        },
    );
    Report::new(
        "repeat_listens",
        "Tracks played beyond the repeat threshold",
        &["track", "artist", "plays"],
        rows,
    )
}

// ============================================
// Rates
// ============================================

/// Shuffle-mode play count and rate.
pub fn shuffle_usage(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let all = refs(events);
    let shuffled = count_where(&all, |e| e.shuffle);
    Report::new(
        "shuffle_usage",
        "Shuffle usage",
        &["shuffle_plays", "shuffle_rate"],
        vec![vec![
            Cell::from(shuffled),
            Cell::from(Percent::of_counts(shuffled, count(&all), opts.decimals)),
        ]],
    )
}

/// Skip count, skip rate and retention rate over all plays.
pub fn skip_summary(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let all = refs(events);
    let total = count(&all);
    let skips = count_where(&all, |e| e.skipped);
    Report::new(
        "skip_summary",
        "Skip summary",
        &["skips", "skip_rate", "retention_rate"],
        vec![vec![
            Cell::from(skips),
            Cell::from(Percent::of_counts(skips, total, opts.decimals)),
            Cell::from(Percent::of_counts(total - skips, total, opts.decimals)),
        ]],
    )
}

fn skip_rate_rows<K, F>(events: &[PlayEvent], key_fn: F, key_cell: fn(&K) -> Cell, opts: &ReportOptions) -> Vec<Vec<Cell>>
where
    K: Ord,
    F: Fn(&PlayEvent) -> K,
{
    group_by(events, key_fn)
        .iter()
        .map(|g| {
            let plays = count(&g.events);
            let skips = count_where(&g.events, |e| e.skipped);
            vec![
                key_cell(&g.key),
                Cell::from(plays),
                Cell::from(skips),
                Cell::from(Percent::of_counts(skips, plays, opts.decimals)),
            ]
        })
        .collect()
}

/// Skip rate per playback platform.
pub fn skip_rate_by_platform(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let rows = skip_rate_rows(events, |e| e.platform.clone(), |k| Cell::text(k), opts);
    Report::new(
        "skip_rate_by_platform",
        "Skip rate by platform",
        &["platform", "plays", "skips", "skip_rate"],
        rows,
    )
}

/// Skip rate with shuffle on vs off.
pub fn skip_rate_by_shuffle(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let rows = skip_rate_rows(
        events,
        |e| e.shuffle,
        |k| Cell::text(if *k { "on" } else { "off" }),
        opts,
    );
    Report::new(
        "skip_rate_by_shuffle",
        "Skip rate by shuffle state",
        &["shuffle", "plays", "skips", "skip_rate"],
        rows,
    )
}

// ============================================
// Reasons and platforms
// ============================================

fn share_ranked_rows<F>(events: &[PlayEvent], key_fn: F, n: usize, decimals: u32) -> Vec<Vec<Cell>>
where
    F: Fn(&PlayEvent) -> String,
{
    let groups = group_by(events, key_fn);
    let counts: Vec<f64> = groups.iter().map(|g| count(&g.events) as f64).collect();
    let shares = percent_of_total(&counts, decimals);
    let entries: Vec<(String, u64, Percent)> = groups
        .into_iter()
        .zip(shares)
        .map(|(g, share)| (g.key, count(&g.events), share))
        .collect();
    top_n(entries, |(_, plays, _)| *plays, n)
        .into_iter()
        .map(|(key, plays, share)| {
            vec![Cell::Text(key), Cell::from(plays), Cell::from(share)]
        })
        .collect()
}

/// Most common causes for a play starting.
pub fn start_reasons(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let rows = share_ranked_rows(events, |e| e.reason_start.clone(), opts.top_n, opts.decimals);
    Report::new(
        "start_reasons",
        "Most common start reasons",
        &["reason", "plays", "share"],
        rows,
    )
}

/// Most common causes for a play ending.
pub fn end_reasons(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let rows = share_ranked_rows(events, |e| e.reason_end.clone(), opts.top_n, opts.decimals);
    Report::new(
        "end_reasons",
        "Most common end reasons",
        &["reason", "plays", "share"],
        rows,
    )
}

/// Play count and share per platform.
pub fn platform_usage(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let rows = share_ranked_rows(events, |e| e.platform.clone(), usize::MAX, opts.decimals);
    Report::new(
        "platform_usage",
        "Platform usage",
        &["platform", "plays", "share"],
        rows,
    )
}

/// Average play duration per platform.
pub fn avg_playtime_by_platform(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    let rows = group_by(events, |e| e.platform.clone())
        .iter()
        .map(|g| {
            vec![
                Cell::text(&g.key),
                Cell::Float(round_to(avg_ms(&g.events), 1)),
            ]
        })
        .collect();
    Report::new(
        "avg_playtime_by_platform",
        "Average play time by platform",
        &["platform", "avg_ms_played"],
        rows,
    )
}

/// Average play duration per artist, ranked.
pub fn avg_playtime_by_artist(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let groups = group_by(events, |e| e.artist_name.clone());
    let rows = ranked_rows(
        groups,
        |g| avg_ms(&g.events),
        opts.top_n,
        |g| {
            vec![
                Cell::text(&g.key),
                Cell::Float(round_to(avg_ms(&g.events), 1)),
            ]
        },
    );
    Report::new(
        "avg_playtime_by_artist",
        "Average play time by artist",
        &["artist", "avg_ms_played"],
        rows,
    )
}

// ============================================
// Time-of-day and calendar trends
// ============================================

/// The hours with the most plays, with their share of timestamped plays.
pub fn peak_hours(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let buckets = bucket_by_time(events, Granularity::HourOfDay);
    let counts: Vec<f64> = buckets.buckets.iter().map(|b| b.events.len() as f64).collect();
    let shares = percent_of_total(&counts, opts.decimals);
    let entries: Vec<(TimeKey, u64, Percent)> = buckets
        .buckets
        .iter()
        .zip(shares)
        .map(|(b, share)| (b.key, b.events.len() as u64, share))
        .collect();
    let rows = top_n(entries, |(_, plays, _)| *plays, opts.peak_hours)
        .into_iter()
        .map(|(key, plays, share)| {
            vec![Cell::Text(key.to_string()), Cell::from(plays), Cell::from(share)]
        })
        .collect();
    Report::time_filtered(
        "peak_hours",
        "Peak listening hours",
        &["hour", "plays", "share"],
        rows,
        buckets.invalid_timestamps,
    )
}

/// Plays per hour of day, all 24 hours.
pub fn hourly_distribution(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    let buckets = bucket_by_time(events, Granularity::HourOfDay);
    let mut per_hour = [0u64; 24];
    for bucket in &buckets.buckets {
        if let TimeKey::Hour(h) = bucket.key {
            per_hour[h as usize] = bucket.events.len() as u64;
        }
    }
    let rows = (0..24)
        .map(|h| {
            vec![
                Cell::Text(TimeKey::Hour(h).to_string()),
                Cell::from(per_hour[h as usize]),
            ]
        })
        .collect();
    Report::time_filtered(
        "hourly_distribution",
        "Plays by hour of day",
        &["hour", "plays"],
        rows,
        buckets.invalid_timestamps,
    )
}

/// The calendar day with the most plays.
pub fn busiest_day(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    let buckets = bucket_by_time(events, Granularity::Day);
    let entries: Vec<(TimeKey, u64)> = buckets
        .buckets
        .iter()
        .map(|b| (b.key, b.events.len() as u64))
        .collect();
    let rows = top_n(entries, |(_, plays)| *plays, 1)
        .into_iter()
        .map(|(key, plays)| vec![Cell::Text(key.to_string()), Cell::from(plays)])
        .collect();
    Report::time_filtered(
        "busiest_day",
        "Day with most plays",
        &["date", "plays"],
        rows,
        buckets.invalid_timestamps,
    )
}

/// Chronological plays-per-day time series.
pub fn daily_play_counts(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    let buckets = bucket_by_time(events, Granularity::Day);
    let rows = buckets
        .buckets
        .iter()
        .map(|b| {
            vec![
                Cell::Text(b.key.to_string()),
                Cell::from(b.events.len() as u64),
            ]
        })
        .collect();
    Report::time_filtered(
        "daily_play_counts",
        "Plays per day",
        &["date", "plays"],
        rows,
        buckets.invalid_timestamps,
    )
}

/// Plays during nocturnal hours, with their share of timestamped plays.
pub fn nocturnal_plays(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let buckets = bucket_by_time(events, Granularity::HourOfDay);
    let timestamped = buckets.bucketed_events() as u64;
    let nocturnal: u64 = buckets
        .buckets
        .iter()
        .filter(|b| matches!(b.key, TimeKey::Hour(h) if opts.nocturnal_hours.contains(&h)))
        .map(|b| b.events.len() as u64)
        .sum();
    Report::time_filtered(
        "nocturnal_plays",
        "Nocturnal plays",
        &["plays", "share"],
        vec![vec![
            Cell::from(nocturnal),
            Cell::from(Percent::of_counts(nocturnal, timestamped, opts.decimals)),
        ]],
        buckets.invalid_timestamps,
    )
}

fn period_summary_rows(events: &[PlayEvent], granularity: Granularity) -> (Vec<Vec<Cell>>, usize) {
    let buckets = bucket_by_time(events, granularity);
    let rows = buckets
        .buckets
        .iter()
        .map(|b| {
            vec![
                Cell::Text(b.key.to_string()),
                Cell::from(b.events.len() as u64),
                Cell::Float(minutes(sum_ms(&b.events))),
                Cell::from(distinct(&b.events, |e| e.track_key())),
            ]
        })
        .collect();
    (rows, buckets.invalid_timestamps)
}

/// Plays, minutes and unique tracks per calendar month.
pub fn monthly_summary(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    let (rows, excluded) = period_summary_rows(events, Granularity::Month);
    Report::time_filtered(
        "monthly_summary",
        "Monthly listening summary",
        &["month", "plays", "minutes_played", "unique_tracks"],
        rows,
        excluded,
    )
}

/// Plays, minutes and unique tracks per calendar year.
pub fn yearly_summary(events: &[PlayEvent], _opts: &ReportOptions) -> Report {
    let (rows, excluded) = period_summary_rows(events, Granularity::Year);
    Report::time_filtered(
        "yearly_summary",
        "Yearly listening summary",
        &["year", "plays", "minutes_played", "unique_tracks"],
        rows,
        excluded,
    )
}

// ============================================
// Anomalies
// ============================================

/// Tracks whose plays are cut short before the abandonment threshold.
///
/// Zero-length tracks have an undefined percent-played and never match; the
/// comparison is real-valued throughout.
pub fn abandoned_tracks(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let abandoned: Vec<PlayEvent> = events
        .iter()
        .filter(|e| {
            percent_played(e, 4)
                .value()
                .map(|pct| pct < opts.abandoned_threshold_pct)
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    let groups = group_by(&abandoned, |e| e.track_key());
    let rows = ranked_rows(
        groups,
        |g| count(&g.events) as f64,
        opts.top_n,
        |g| {
            vec![
                Cell::text(&g.key.0),
                Cell::text(&g.key.1),
                Cell::from(count(&g.events)),
            ]
        },
    );
    Report::new(
        "abandoned_tracks",
        "Tracks abandoned early",
        &["track", "artist", "abandoned_plays"],
        rows,
    )
}

/// Autoplay plays skipped away almost immediately.
pub fn autoplay_quick_skips(events: &[PlayEvent], opts: &ReportOptions) -> Report {
    let quick: Vec<PlayEvent> = events
        .iter()
        .filter(|e| e.reason_start == "autoplay" && e.ms_played < opts.quick_skip_ms)
        .cloned()
        .collect();
    let groups = group_by(&quick, |e| e.track_key());
    let rows = ranked_rows(
        groups,
        |g| count(&g.events) as f64,
        opts.top_n,
        |g| {
            vec![
                Cell::text(&g.key.0),
                Cell::text(&g.key.1),
                Cell::from(count(&g.events)),
            ]
        },
    );
    Report::new(
        "autoplay_quick_skips",
        "Autoplay plays skipped immediately",
        &["track", "artist", "quick_skips"],
        rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayedAt;
    use chrono::NaiveDate;

    fn event(track: &str, artist: &str, ms: u64) -> PlayEvent {
        PlayEvent {
            track_uri: format!("spotify:track:{track}"),
            played_at: PlayedAt::Valid {
                at: NaiveDate::from_ymd_opt(2025, 5, 14)
                    .unwrap()
                    .and_hms_opt(23, 10, 0)
                    .unwrap(),
            },
            platform: "android".to_string(),
            ms_played: ms,
            track_duration_secs: 30,
            track_name: track.to_string(),
            artist_name: artist.to_string(),
            album_name: "Album".to_string(),
            reason_start: "clickrow".to_string(),
            reason_end: "trackdone".to_string(),
            shuffle: false,
            skipped: false,
        }
    }

    fn opts() -> ReportOptions {
        ReportOptions::default()
    }

    #[test]
    fn test_total_and_unique_counts() {
        let events = vec![
            event("A", "X", 1000),
            event("A", "X", 1000),
            event("B", "Y", 1000),
        ];
        let totals = total_plays(&events, &opts());
        assert_eq!(totals.rows[0][0], Cell::Int(3));

        let uniques = unique_counts(&events, &opts());
        assert_eq!(uniques.rows[0][0], Cell::Int(2)); // tracks
        assert_eq!(uniques.rows[0][1], Cell::Int(2)); // artists
    }

    #[test]
    fn test_top_tracks_tie_break_by_key() {
        // "A" and "B" tie on plays; ascending track key wins the tie
        let events = vec![
            event("B", "X", 1000),
            event("A", "X", 1000),
            event("B", "X", 1000),
            event("A", "X", 1000),
            event("C", "X", 1000),
        ];
        let report = top_tracks_by_plays(&events, &opts());
        assert_eq!(report.rows[0][0], Cell::text("A"));
        assert_eq!(report.rows[1][0], Cell::text("B"));
        assert_eq!(report.rows[2][0], Cell::text("C"));
    }

    #[test]
    fn test_skip_summary_rates() {
        let mut events = vec![
            event("A", "X", 1000),
            event("B", "X", 1000),
            event("C", "X", 1000),
            event("D", "X", 1000),
        ];
        events[0].skipped = true;
        events[1].skipped = true;
        let report = skip_summary(&events, &opts());
        assert_eq!(report.rows[0][0], Cell::Int(2));
        assert_eq!(report.rows[0][1], Cell::Percent(Percent::Value(50.0)));
        assert_eq!(report.rows[0][2], Cell::Percent(Percent::Value(50.0)));
    }

    #[test]
    fn test_skip_summary_empty_input_undefined() {
        let report = skip_summary(&[], &opts());
        assert_eq!(report.rows[0][1], Cell::Percent(Percent::Undefined));
    }

    #[test]
    fn test_platform_share_sums_to_hundred() {
        let mut events = Vec::new();
        for (platform, n) in [("android", 7), ("ios", 11), ("web player", 3)] {
            for _ in 0..n {
                let mut e = event("A", "X", 1000);
                e.platform = platform.to_string();
                events.push(e);
            }
        }
        let report = platform_usage(&events, &opts());
        let sum: f64 = report
            .rows
            .iter()
            .filter_map(|r| match r[2] {
                Cell::Percent(p) => p.value(),
                _ => None,
            })
            .sum();
        assert!((sum - 100.0).abs() <= 0.2, "sum was {sum}");
    }

    #[test]
    fn test_abandoned_tracks_guards_zero_length() {
        let mut short = event("A", "X", 5000); // 16.67% of 30s
        short.track_duration_secs = 30;
        let mut zero = event("Z", "X", 100);
        zero.track_duration_secs = 0;
        let full = event("B", "X", 30_000);

        let events = vec![short, zero, full];
        let report = abandoned_tracks(&events, &opts());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0][0], Cell::text("A"));
    }

    #[test]
    fn test_autoplay_quick_skips_filter() {
        let mut quick = event("A", "X", 900);
        quick.reason_start = "autoplay".to_string();
        let mut long_autoplay = event("B", "X", 60_000);
        long_autoplay.reason_start = "autoplay".to_string();
        let quick_but_manual = event("C", "X", 900);

        let events = vec![quick, long_autoplay, quick_but_manual];
        let report = autoplay_quick_skips(&events, &opts());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0][0], Cell::text("A"));
    }

    #[test]
    fn test_repeat_listens_threshold() {
        let mut events = Vec::new();
        for _ in 0..11 {
            events.push(event("A", "X", 1000));
        }
        for _ in 0..10 {
            events.push(event("B", "X", 1000));
        }
        let report = repeat_listens(&events, &opts());
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0][0], Cell::text("A"));
        assert_eq!(report.rows[0][2], Cell::Int(11));
    }

    #[test]
    fn test_time_reports_surface_invalid_count() {
        let mut events = vec![event("A", "X", 1000), event("B", "X", 1000)];
        events[1].played_at = PlayedAt::Invalid {
            raw: "garbage".to_string(),
        };
        for report in [
            peak_hours(&events, &opts()),
            hourly_distribution(&events, &opts()),
            busiest_day(&events, &opts()),
            daily_play_counts(&events, &opts()),
            nocturnal_plays(&events, &opts()),
            monthly_summary(&events, &opts()),
            yearly_summary(&events, &opts()),
        ] {
            assert_eq!(
                report.excluded_invalid_timestamps,
                Some(1),
                "report {} must surface the exclusion",
                report.name
            );
        }
    }

    #[test]
    fn test_nocturnal_plays_hours() {
        let at_23 = event("A", "X", 1000); // 23:10 fixture hour
        let mut at_8 = event("B", "X", 1000);
        at_8.played_at = PlayedAt::Valid {
            at: NaiveDate::from_ymd_opt(2025, 5, 14)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        };
        let mut at_2 = event("C", "X", 1000);
        at_2.played_at = PlayedAt::Valid {
            at: NaiveDate::from_ymd_opt(2025, 5, 15)
                .unwrap()
                .and_hms_opt(2, 30, 0)
                .unwrap(),
        };

        let events = vec![at_23, at_8, at_2];
        let report = nocturnal_plays(&events, &opts());
        assert_eq!(report.rows[0][0], Cell::Int(2));
        assert_eq!(report.rows[0][1], Cell::Percent(Percent::Value(66.7)));
    }

    #[test]
    fn test_monthly_summary_values() {
        let may = event("A", "X", 120_000);
        let mut june = event("B", "X", 60_000);
        june.played_at = PlayedAt::Valid {
            at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        };

        let events = vec![may.clone(), may, june];
        let report = monthly_summary(&events, &opts());
        assert_eq!(report.rows.len(), 2);
        // May: 2 plays, 4 minutes, 1 unique track
        assert_eq!(report.rows[0][0], Cell::text("2025-05"));
        assert_eq!(report.rows[0][1], Cell::Int(2));
        assert_eq!(report.rows[0][2], Cell::Float(4.0));
        assert_eq!(report.rows[0][3], Cell::Int(1));
    }

    #[test]
    fn test_hourly_distribution_has_all_hours() {
        let events = vec![event("A", "X", 1000)];
        let report = hourly_distribution(&events, &opts());
        assert_eq!(report.rows.len(), 24);
        assert_eq!(report.rows[23][1], Cell::Int(1));
        assert_eq!(report.rows[0][1], Cell::Int(0));
    }
}
