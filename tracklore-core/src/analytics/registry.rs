//! Report registry for discovery and dispatch.
//!
//! Every catalogue report is listed here with a stable name and a one-line
//! summary, so front ends can enumerate reports and run them by name without
//! knowing the functions behind them.

use super::catalogue;
use super::report::{Report, ReportOptions};
use crate::error::{Error, Result};
use crate::types::PlayEvent;

/// Broad grouping of reports, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Whole-batch totals and tallies
    Overview,
    /// Ranked tables (top tracks, artists, albums)
    Ranking,
    /// Rates and shares
    Rate,
    /// Calendar and hour-of-day trends
    Trend,
    /// Suspicious listening patterns
    Anomaly,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Overview => "overview",
            ReportKind::Ranking => "ranking",
            ReportKind::Rate => "rate",
            ReportKind::Trend => "trend",
            ReportKind::Anomaly => "anomaly",
        }
    }
}

type ReportFn = fn(&[PlayEvent], &ReportOptions) -> Report;

/// Descriptor for one catalogue report.
#[derive(Debug, Clone)]
pub struct ReportDescriptor {
    pub name: &'static str,
    pub kind: ReportKind,
    pub summary: &'static str,
    run: ReportFn,
}

impl ReportDescriptor {
    /// Compute this report.
    pub fn run(&self, events: &[PlayEvent], opts: &ReportOptions) -> Report {
        (self.run)(events, opts)
    }
}

const REPORTS: &[ReportDescriptor] = &[
    ReportDescriptor {
        name: "total_plays",
        kind: ReportKind::Overview,
        summary: "Total number of play events.",
        run: catalogue::total_plays,
    },
    ReportDescriptor {
        name: "unique_counts",
        kind: ReportKind::Overview,
        summary: "Distinct track, artist and album counts.",
        run: catalogue::unique_counts,
    },
    ReportDescriptor {
        name: "invalid_timestamps",
        kind: ReportKind::Overview,
        summary: "Events whose timestamp did not parse.",
        run: catalogue::invalid_timestamps,
    },
    ReportDescriptor {
        name: "top_tracks_by_plays",
        kind: ReportKind::Ranking,
        summary: "Most-played tracks by play count.",
        run: catalogue::top_tracks_by_plays,
    },
    ReportDescriptor {
        name: "top_tracks_by_playtime",
        kind: ReportKind::Ranking,
        summary: "Most-played tracks by cumulative play time.",
        run: catalogue::top_tracks_by_playtime,
    },
    ReportDescriptor {
        name: "top_artists_by_plays",
        kind: ReportKind::Ranking,
        summary: "Most-played artists by play count.",
        run: catalogue::top_artists_by_plays,
    },
    ReportDescriptor {
        name: "top_artists_by_playtime",
        kind: ReportKind::Ranking,
        summary: "Most-played artists by cumulative play time.",
        run: catalogue::top_artists_by_playtime,
    },
    ReportDescriptor {
        name: "top_albums_by_playtime",
        kind: ReportKind::Ranking,
        summary: "Most-played albums by cumulative play time.",
        run: catalogue::top_albums_by_playtime,
    },
    ReportDescriptor {
        name: "repeat_listens",
        kind: ReportKind::Ranking,
        summary: "Tracks played more often than the repeat threshold.",
        run: catalogue::repeat_listens,
    },
    ReportDescriptor {
        name: "shuffle_usage",
        kind: ReportKind::Rate,
        summary: "Shuffle-mode play count and rate.",
        run: catalogue::shuffle_usage,
    },
    ReportDescriptor {
        name: "skip_summary",
        kind: ReportKind::Rate,
        summary: "Skip count, skip rate and retention rate.",
        run: catalogue::skip_summary,
    },
    ReportDescriptor {
        name: "skip_rate_by_platform",
        kind: ReportKind::Rate,
        summary: "Skip rate per playback platform.",
        run: catalogue::skip_rate_by_platform,
    },
    ReportDescriptor {
        name: "skip_rate_by_shuffle",
        kind: ReportKind::Rate,
        summary: "Skip rate with shuffle on vs off.",
        run: catalogue::skip_rate_by_shuffle,
    },
    ReportDescriptor {
        name: "start_reasons",
        kind: ReportKind::Rate,
        summary: "Most common causes for a play starting.",
        run: catalogue::start_reasons,
    },
    ReportDescriptor {
        name: "end_reasons",
        kind: ReportKind::Rate,
        summary: "Most common causes for a play ending.",
        run: catalogue::end_reasons,
    },
    ReportDescriptor {
        name: "platform_usage",
        kind: ReportKind::Rate,
        summary: "Play count and share per platform.",
        run: catalogue::platform_usage,
    },
    ReportDescriptor {
        name: "avg_playtime_by_platform",
        kind: ReportKind::Rate,
        summary: "Average play duration per platform.",
        run: catalogue::avg_playtime_by_platform,
    },
    ReportDescriptor {
        name: "avg_playtime_by_artist",
        kind: ReportKind::Rate,
        summary: "Average play duration per artist.",
        run: catalogue::avg_playtime_by_artist,
    },
    ReportDescriptor {
        name: "peak_hours",
        kind: ReportKind::Trend,
        summary: "Hours with the most plays and their share.",
        run: catalogue::peak_hours,
    },
    ReportDescriptor {
        name: "hourly_distribution",
        kind: ReportKind::Trend,
        summary: "Plays per hour of day.",
        run: catalogue::hourly_distribution,
    },
    ReportDescriptor {
        name: "busiest_day",
        kind: ReportKind::Trend,
        summary: "Calendar day with the most plays.",
        run: catalogue::busiest_day,
    },
    ReportDescriptor {
        name: "daily_play_counts",
        kind: ReportKind::Trend,
        summary: "Chronological plays-per-day series.",
        run: catalogue::daily_play_counts,
    },
    ReportDescriptor {
        name: "nocturnal_plays",
        kind: ReportKind::Trend,
        summary: "Plays during late-night hours.",
        run: catalogue::nocturnal_plays,
    },
    ReportDescriptor {
        name: "monthly_summary",
        kind: ReportKind::Trend,
        summary: "Plays, minutes and unique tracks per month.",
        run: catalogue::monthly_summary,
    },
    ReportDescriptor {
        name: "yearly_summary",
        kind: ReportKind::Trend,
        summary: "Plays, minutes and unique tracks per year.",
        run: catalogue::yearly_summary,
    },
    ReportDescriptor {
        name: "abandoned_tracks",
        kind: ReportKind::Anomaly,
        summary: "Tracks whose plays stop well before the end.",
        run: catalogue::abandoned_tracks,
    },
    ReportDescriptor {
        name: "autoplay_quick_skips",
        kind: ReportKind::Anomaly,
        summary: "Autoplay plays skipped away almost immediately.",
        run: catalogue::autoplay_quick_skips,
    },
];

/// List all registered reports.
pub fn list_reports() -> Vec<ReportDescriptor> {
    REPORTS.to_vec()
}

/// List reports of a given kind.
pub fn list_reports_of_kind(kind: ReportKind) -> Vec<ReportDescriptor> {
    REPORTS.iter().filter(|r| r.kind == kind).cloned().collect()
}

/// Run one report by name.
pub fn run_report(name: &str, events: &[PlayEvent], opts: &ReportOptions) -> Result<Report> {
    let descriptor = REPORTS
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| Error::UnknownReport(name.to_string()))?;

    tracing::debug!(report = name, events = events.len(), "Running report");
    Ok(descriptor.run(events, opts))
}

/// Run every report in the catalogue, in registry order.
pub fn run_all(events: &[PlayEvent], opts: &ReportOptions) -> Vec<Report> {
    REPORTS.iter().map(|r| r.run(events, opts)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_are_unique() {
        let mut names: Vec<&str> = REPORTS.iter().map(|r| r.name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_descriptor_names_match_report_names() {
        let opts = ReportOptions::default();
        for descriptor in REPORTS {
            let report = descriptor.run(&[], &opts);
            assert_eq!(report.name, descriptor.name);
        }
    }

    #[test]
    fn test_run_report_unknown_name() {
        let opts = ReportOptions::default();
        let err = run_report("no_such_report", &[], &opts).unwrap_err();
        assert!(matches!(err, Error::UnknownReport(_)));
    }

    #[test]
    fn test_run_all_on_empty_input_never_panics() {
        let reports = run_all(&[], &ReportOptions::default());
        assert_eq!(reports.len(), REPORTS.len());
    }

    #[test]
    fn test_list_reports_of_kind() {
        let anomalies = list_reports_of_kind(ReportKind::Anomaly);
        assert_eq!(anomalies.len(), 2);
        assert!(anomalies.iter().any(|r| r.name == "abandoned_tracks"));
    }
}
