//! Listening summary - Year/Month in Review
//!
//! Generates "year in review"-style summaries of streaming history for a
//! calendar period, with optional trend comparison against the previous
//! period.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::aggregate::{count, count_where, distinct, sum_ms, top_n, Percent};
use super::report::ReportOptions;
use crate::types::PlayEvent;

/// Time period for a listening summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    /// Full year (e.g., 2025)
    Year(i32),
    /// Specific month (year, month 1-12)
    Month(i32, u32),
}

impl SummaryPeriod {
    /// Get the start datetime for this period.
    pub fn start(&self) -> NaiveDateTime {
        match self {
            SummaryPeriod::Year(year) => NaiveDate::from_ymd_opt(*year, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            SummaryPeriod::Month(year, month) => NaiveDate::from_ymd_opt(*year, *month, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    /// Get the end datetime for this period (exclusive).
    pub fn end(&self) -> NaiveDateTime {
        match self {
            SummaryPeriod::Year(year) => NaiveDate::from_ymd_opt(*year + 1, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            SummaryPeriod::Month(year, month) => {
                let (next_year, next_month) = if *month == 12 {
                    (*year + 1, 1)
                } else {
                    (*year, *month + 1)
                };
                NaiveDate::from_ymd_opt(next_year, next_month, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }
        }
    }

    /// Get the previous period for trend comparison.
    pub fn previous(&self) -> Self {
        match self {
            SummaryPeriod::Year(year) => SummaryPeriod::Year(*year - 1),
            SummaryPeriod::Month(year, month) => {
                if *month == 1 {
                    SummaryPeriod::Month(*year - 1, 12)
                } else {
                    SummaryPeriod::Month(*year, *month - 1)
                }
            }
        }
    }

    /// Get display name for this period.
    pub fn display_name(&self) -> String {
        match self {
            SummaryPeriod::Year(year) => format!("{}", year),
            SummaryPeriod::Month(year, month) => {
                format!("{} {}", crate::format::month_name(*month), year)
            }
        }
    }

    /// Whether a timestamp falls inside this period.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start() && at < self.end()
    }
}

/// Configuration for summary generation.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Include trend comparison with previous period
    pub include_trends: bool,
    /// Number of top tracks to include
    pub top_tracks_count: usize,
    /// Number of top artists to include
    pub top_artists_count: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            include_trends: true,
            top_tracks_count: 5,
            top_artists_count: 5,
        }
    }
}

/// Complete listening summary for a period.
#[derive(Debug, Clone)]
pub struct ListeningSummary {
    /// The time period this summary covers
    pub period: SummaryPeriod,
    /// Aggregate totals
    pub totals: PeriodTotals,
    /// Top tracks: (track, artist, plays)
    pub top_tracks: Vec<(String, String, u64)>,
    /// Top artists: (artist, plays)
    pub top_artists: Vec<(String, u64)>,
    /// Plays per hour of day (0-23)
    pub hourly_distribution: [u64; 24],
    /// Peak hour (0-23)
    pub peak_hour: u8,
    /// Skip rate for the period
    pub skip_rate: Percent,
    /// Comparison with previous period (None if not requested or no data)
    pub trends: Option<TrendComparison>,
    /// Events excluded because their timestamp is invalid
    pub invalid_timestamps: usize,
}

/// Aggregate totals for a period.
#[derive(Debug, Clone, Default)]
pub struct PeriodTotals {
    /// Number of plays
    pub plays: u64,
    /// Total milliseconds played
    pub ms_played: u64,
    /// Number of distinct tracks
    pub unique_tracks: u64,
    /// Number of distinct artists
    pub unique_artists: u64,
}

impl PeriodTotals {
    /// Total listening time in whole minutes.
    pub fn minutes_played(&self) -> u64 {
        self.ms_played / 60_000
    }

    /// Format total listening time for display (e.g., "312h 45m").
    pub fn duration_display(&self) -> String {
        crate::format::format_ms_duration(self.ms_played)
    }
}

/// Trend comparison with previous period.
#[derive(Debug, Clone, Default)]
pub struct TrendComparison {
    /// Plays change percentage
    pub plays_delta_pct: f64,
    /// Listening time change percentage
    pub minutes_delta_pct: f64,
    /// Unique tracks change percentage
    pub unique_tracks_delta_pct: f64,
    /// Previous period totals (for context)
    pub previous_totals: PeriodTotals,
}

impl TrendComparison {
    /// Calculate delta percentage between two values.
    pub fn calc_delta(current: u64, previous: u64) -> f64 {
        if previous == 0 {
            if current == 0 {
                0.0
            } else {
                100.0 // Growth from nothing shown as 100%
            }
        } else {
            ((current as f64 - previous as f64) / previous as f64) * 100.0
        }
    }

    /// Format delta for display (e.g., "+23%" or "-15%").
    pub fn format_delta(delta: f64) -> String {
        if delta >= 0.0 {
            format!("+{:.0}%", delta)
        } else {
            format!("{:.0}%", delta)
        }
    }
}

fn period_totals(events: &[&PlayEvent]) -> PeriodTotals {
    PeriodTotals {
        plays: count(events),
        ms_played: sum_ms(events),
        unique_tracks: distinct(events, |e| e.track_key()),
        unique_artists: distinct(events, |e| e.artist_name.clone()),
    }
}

/// Generate a listening summary for a period.
///
/// Events with invalid timestamps cannot be assigned to a period; they are
/// excluded and counted in [`ListeningSummary::invalid_timestamps`].
pub fn listening_summary(
    events: &[PlayEvent],
    period: SummaryPeriod,
    config: &SummaryConfig,
    opts: &ReportOptions,
) -> ListeningSummary {
    let invalid_timestamps = events.iter().filter(|e| !e.played_at.is_valid()).count();

    let in_period: Vec<&PlayEvent> = events
        .iter()
        .filter(|e| e.played_at.valid().map(|at| period.contains(at)).unwrap_or(false))
        .collect();

    let totals = period_totals(&in_period);

    let mut hourly_distribution = [0u64; 24];
    for event in &in_period {
        if let Some(at) = event.played_at.valid() {
            hourly_distribution[at.hour() as usize] += 1;
        }
    }
    let peak_hour = hourly_distribution
        .iter()
        .enumerate()
        .max_by_key(|(_, &count)| count)
        .map(|(hour, _)| hour as u8)
        .unwrap_or(0);

    let skips = count_where(&in_period, |e| e.skipped);
    let skip_rate = Percent::of_counts(skips, totals.plays, opts.decimals);

    // Rankings over a by-key map in ascending order, ties resolved by key
    let mut track_counts: std::collections::BTreeMap<(String, String), u64> =
        std::collections::BTreeMap::new();
    let mut artist_counts: std::collections::BTreeMap<String, u64> =
        std::collections::BTreeMap::new();
    for event in &in_period {
        *track_counts.entry(event.track_key()).or_insert(0) += 1;
        *artist_counts.entry(event.artist_name.clone()).or_insert(0) += 1;
    }

    let top_tracks = top_n(
        track_counts.into_iter().collect::<Vec<_>>(),
        |(_, plays)| *plays,
        config.top_tracks_count,
    )
    .into_iter()
    .map(|((track, artist), plays)| (track, artist, plays))
    .collect();

    let top_artists = top_n(
        artist_counts.into_iter().collect::<Vec<_>>(),
        |(_, plays)| *plays,
        config.top_artists_count,
    );

    // Trends only when the previous period actually has data
    let trends = if config.include_trends {
        let prev = period.previous();
        let prev_events: Vec<&PlayEvent> = events
            .iter()
            .filter(|e| e.played_at.valid().map(|at| prev.contains(at)).unwrap_or(false))
            .collect();
        let prev_totals = period_totals(&prev_events);

        if prev_totals.plays > 0 {
            Some(TrendComparison {
                plays_delta_pct: TrendComparison::calc_delta(totals.plays, prev_totals.plays),
                minutes_delta_pct: TrendComparison::calc_delta(
                    totals.minutes_played(),
                    prev_totals.minutes_played(),
                ),
                unique_tracks_delta_pct: TrendComparison::calc_delta(
                    totals.unique_tracks,
                    prev_totals.unique_tracks,
                ),
                previous_totals: prev_totals,
            })
        } else {
            None
        }
    } else {
        None
    };

    ListeningSummary {
        period,
        totals,
        top_tracks,
        top_artists,
        hourly_distribution,
        peak_hour,
        skip_rate,
        trends,
        invalid_timestamps,
    }
}
