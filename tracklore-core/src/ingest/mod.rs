//! Ingestion layer for raw streaming-history exports
//!
//! This module turns export files (Layer 0) into normalized play events
//! (Layer 1), keeping an exact account of what happened to every row.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │  Export files   │ ──► │   Importer   │ ──► │   ImportResult   │
//! │ (*.tsv, *.txt)  │     │              │     │ events + tallies │
//! └─────────────────┘     └──────────────┘     └──────────────────┘
//!                               │
//!                               ▼
//!                      ┌─────────────────┐
//!                      │   normalize()   │
//!                      └─────────────────┘
//! ```
//!
//! Rows that fail normalization are collected in [`ImportResult::rejected`]
//! with their line number and cause — never silently discarded. Rows whose
//! timestamp is unparsable are accepted with an invalid timestamp and counted
//! in [`ImportResult::invalid_timestamps`].

mod normalize;

pub use normalize::{normalize, parse_played_at};

use crate::error::{Error, NormalizeError, Result};
use crate::types::{PlayEvent, RawRow, EXPORT_COLUMNS};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Why a row was rejected during import.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// Wrong number of delimited cells
    #[error("expected {expected} columns, found {found}")]
    Shape { expected: usize, found: usize },

    /// The row split correctly but a field failed to normalize
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// A rejected input row, kept for reporting.
#[derive(Debug, Clone)]
pub struct RejectedRow {
    /// 1-based line number in the source
    pub line: usize,
    /// The original line text
    pub raw: String,
    /// Why the row was rejected
    pub error: RowError,
}

/// Outcome of importing one export source.
#[derive(Debug, Default)]
pub struct ImportResult {
    /// Accepted events, in source order (includes timestamp-invalid rows)
    pub events: Vec<PlayEvent>,
    /// Rows that failed normalization, with causes
    pub rejected: Vec<RejectedRow>,
    /// Total data rows read (excludes a skipped header line)
    pub rows_read: usize,
    /// Accepted rows whose timestamp did not parse
    pub invalid_timestamps: usize,
}

impl ImportResult {
    /// Number of rows that produced an event.
    pub fn rows_accepted(&self) -> usize {
        self.events.len()
    }

    /// Number of rows that were rejected.
    pub fn rows_rejected(&self) -> usize {
        self.rejected.len()
    }
}

/// Reads delimited export files into normalized play events.
///
/// The export is a fixed twelve-column, delimiter-separated text file with no
/// quoting layer; the default delimiter is tab. A first line listing the
/// canonical column names is skipped as a header.
pub struct Importer {
    delimiter: char,
}

impl Importer {
    /// Create an importer for tab-separated exports.
    pub fn new() -> Self {
        Self { delimiter: '\t' }
    }

    /// Use a different cell delimiter (e.g. `'|'`).
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Import a single export file.
    pub fn import_file(&self, path: &Path) -> Result<ImportResult> {
        let file = File::open(path).map_err(|e| Error::Import {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let reader = BufReader::new(file);

        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line?);
        }

        let result = self.import_lines(lines.iter().map(|l| l.as_str()));
        tracing::info!(
            path = %path.display(),
            rows_read = result.rows_read,
            accepted = result.rows_accepted(),
            rejected = result.rows_rejected(),
            invalid_timestamps = result.invalid_timestamps,
            "Imported export file"
        );
        Ok(result)
    }

    /// Import from an in-memory sequence of lines.
    ///
    /// Blank lines are ignored. This is the core of [`Self::import_file`] and
    /// is directly usable in tests or against other line sources.
    pub fn import_lines<'a>(&self, lines: impl Iterator<Item = &'a str>) -> ImportResult {
        let mut result = ImportResult::default();
        let mut saw_first_row = false;

        for (idx, line) in lines.enumerate() {
            let lineno = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let cells: Vec<&str> = line.split(self.delimiter).collect();
            let row = match RawRow::from_cells(&cells) {
                Some(row) => row,
                None => {
                    saw_first_row = true;
                    result.rows_read += 1;
                    tracing::warn!(line = lineno, found = cells.len(), "Malformed export row");
                    result.rejected.push(RejectedRow {
                        line: lineno,
                        raw: line.to_string(),
                        error: RowError::Shape {
                            expected: EXPORT_COLUMNS.len(),
                            found: cells.len(),
                        },
                    });
                    continue;
                }
            };

            if !saw_first_row {
                saw_first_row = true;
                if row.is_header() {
                    continue;
                }
            }
            result.rows_read += 1;

            match normalize(&row) {
                Ok(event) => {
                    if !event.played_at.is_valid() {
                        result.invalid_timestamps += 1;
                        tracing::debug!(line = lineno, ts = %row.ts, "Kept row with invalid timestamp");
                    }
                    result.events.push(event);
                }
                Err(err) => {
                    tracing::warn!(line = lineno, error = %err, "Rejected export row");
                    result.rejected.push(RejectedRow {
                        line: lineno,
                        raw: line.to_string(),
                        error: RowError::Normalize(err),
                    });
                }
            }
        }

        result
    }

    /// Import every export file under a directory, in path order.
    pub fn import_dir(&self, dir: &Path) -> Result<ImportResult> {
        let mut merged = ImportResult::default();
        for path in discover_exports(dir)? {
            let one = self.import_file(&path)?;
            merged.events.extend(one.events);
            merged.rejected.extend(one.rejected);
            merged.rows_read += one.rows_read;
            merged.invalid_timestamps += one.invalid_timestamps;
        }
        Ok(merged)
    }
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

/// Discover export files under a directory.
///
/// Matches `*.tsv` and `*.txt` directly inside `dir`, sorted by path for a
/// stable import order.
pub fn discover_exports(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in ["*.tsv", "*.txt"] {
        let full_pattern = dir.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        let entries = glob::glob(&pattern_str).map_err(|e| Error::Import {
            path: dir.display().to_string(),
            message: format!("invalid glob pattern: {}", e),
        })?;

        for entry in entries.flatten() {
            paths.push(entry);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "spotify_track_uri\tts\tplatform\tms_played\tlen\ttrack_name\tartist_name\talbum_name\treason_start\treason_end\tshuffle\tskipped";

    fn row(ts: &str, ms: &str, shuffle: &str) -> String {
        format!(
            "spotify:track:abc\t{ts}\tandroid\t{ms}\t30\tSong\tBand\tAlbum\tclickrow\ttrackdone\t{shuffle}\tFALSE"
        )
    }

    #[test]
    fn test_import_skips_header() {
        let lines = [HEADER.to_string(), row("14/05/25 23:10", "5000", "FALSE")];
        let result = Importer::new().import_lines(lines.iter().map(|l| l.as_str()));
        assert_eq!(result.rows_read, 1);
        assert_eq!(result.rows_accepted(), 1);
        assert_eq!(result.rows_rejected(), 0);
    }

    #[test]
    fn test_import_without_header() {
        let lines = [
            row("14/05/25 23:10", "5000", "FALSE"),
            row("15/05/25 08:01", "1000", "TRUE"),
        ];
        let result = Importer::new().import_lines(lines.iter().map(|l| l.as_str()));
        assert_eq!(result.rows_accepted(), 2);
        assert!(result.events[1].shuffle);
    }

    #[test]
    fn test_invalid_timestamp_counted_not_rejected() {
        let lines = [row("garbage", "5000", "FALSE")];
        let result = Importer::new().import_lines(lines.iter().map(|l| l.as_str()));
        assert_eq!(result.rows_accepted(), 1);
        assert_eq!(result.invalid_timestamps, 1);
        assert_eq!(result.rows_rejected(), 0);
        assert!(!result.events[0].played_at.is_valid());
    }

    #[test]
    fn test_malformed_rows_are_reported() {
        let lines = [
            "too\tfew\tcells".to_string(),
            row("14/05/25 23:10", "notanumber", "FALSE"),
            row("14/05/25 23:11", "5000", "maybe"),
        ];
        let result = Importer::new().import_lines(lines.iter().map(|l| l.as_str()));
        assert_eq!(result.rows_accepted(), 0);
        assert_eq!(result.rows_rejected(), 3);

        assert!(matches!(
            result.rejected[0].error,
            RowError::Shape {
                expected: 12,
                found: 3
            }
        ));
        assert!(matches!(
            result.rejected[1].error,
            RowError::Normalize(NormalizeError::BadNumeric {
                field: "ms_played",
                ..
            })
        ));
        assert!(matches!(
            result.rejected[2].error,
            RowError::Normalize(NormalizeError::BadBoolean { field: "shuffle", .. })
        ));
        assert_eq!(result.rejected[1].line, 2);
    }

    #[test]
    fn test_pipe_delimiter() {
        let line = row("14/05/25 23:10", "5000", "FALSE").replace('\t', "|");
        let result = Importer::with_delimiter('|').import_lines(std::iter::once(line.as_str()));
        assert_eq!(result.rows_accepted(), 1);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let lines = ["".to_string(), row("14/05/25 23:10", "5000", "FALSE"), "  ".to_string()];
        let result = Importer::new().import_lines(lines.iter().map(|l| l.as_str()));
        assert_eq!(result.rows_read, 1);
        assert_eq!(result.rows_accepted(), 1);
    }
}
