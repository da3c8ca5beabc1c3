//! Report results
//!
//! Every catalogue entry produces a [`Report`]: an ordered sequence of rows
//! with named columns, suitable for rendering as a table or exporting as
//! JSON. Reports that bucket by time also carry the count of events excluded
//! for having an invalid timestamp.

use super::aggregate::Percent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Percent(Percent),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Cell {
        Cell::Text(value.into())
    }

    pub fn int(value: impl Into<i64>) -> Cell {
        Cell::Int(value.into())
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Cell {
        Cell::Int(value as i64)
    }
}

impl From<Percent> for Cell {
    fn from(value: Percent) -> Cell {
        Cell::Percent(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Percent(p) => write!(f, "{}", p),
        }
    }
}

/// One computed report: named columns, ordered rows.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Registry name, e.g. "skip_summary"
    pub name: &'static str,
    /// Human-readable title
    pub title: &'static str,
    /// Column headers, in cell order
    pub columns: &'static [&'static str],
    /// Data rows; each row has `columns.len()` cells
    pub rows: Vec<Vec<Cell>>,
    /// For time-bucketed reports: events excluded for invalid timestamps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_invalid_timestamps: Option<usize>,
}

impl Report {
    /// Report with no time filtering.
    pub fn new(
        name: &'static str,
        title: &'static str,
        columns: &'static [&'static str],
        rows: Vec<Vec<Cell>>,
    ) -> Self {
        Self {
            name,
            title,
            columns,
            rows,
            excluded_invalid_timestamps: None,
        }
    }

    /// Report over time buckets, carrying the exclusion count.
    pub fn time_filtered(
        name: &'static str,
        title: &'static str,
        columns: &'static [&'static str],
        rows: Vec<Vec<Cell>>,
        excluded: usize,
    ) -> Self {
        Self {
            name,
            title,
            columns,
            rows,
            excluded_invalid_timestamps: Some(excluded),
        }
    }
}

/// Tunable thresholds for the report catalogue.
///
/// Doubles as the `[reports]` section of the config file; every field has a
/// default so a missing section or file behaves identically to defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Decimal places for percentages
    pub decimals: u32,
    /// Entries per ranking report
    pub top_n: usize,
    /// Hours listed by the peak-hours report
    pub peak_hours: usize,
    /// Percent-played below which a play counts as abandoned
    pub abandoned_threshold_pct: f64,
    /// Autoplay plays shorter than this many ms count as quick skips
    pub quick_skip_ms: u64,
    /// Minimum play count for the repeat-listens report
    pub repeat_threshold: u64,
    /// Hours of day counted as nocturnal
    pub nocturnal_hours: Vec<u32>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            decimals: 1,
            top_n: 10,
            peak_hours: 3,
            abandoned_threshold_pct: 30.0,
            quick_skip_ms: 10_000,
            repeat_threshold: 10,
            nocturnal_hours: vec![22, 23, 0, 1, 2, 3, 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::text("abc").to_string(), "abc");
        assert_eq!(Cell::Int(42).to_string(), "42");
        assert_eq!(Cell::Percent(Percent::Undefined).to_string(), "undefined");
        assert_eq!(Cell::Percent(Percent::Value(16.67)).to_string(), "16.67");
    }

    #[test]
    fn test_report_options_defaults() {
        let opts = ReportOptions::default();
        assert_eq!(opts.decimals, 1);
        assert_eq!(opts.top_n, 10);
        assert_eq!(opts.nocturnal_hours, vec![22, 23, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_report_serializes_cells_flat() {
        let report = Report::new(
            "demo",
            "Demo",
            &["name", "plays"],
            vec![vec![Cell::text("Song"), Cell::Int(3)]],
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rows"][0][0], "Song");
        assert_eq!(json["rows"][0][1], 3);
        assert!(json.get("excluded_invalid_timestamps").is_none());
    }
}
