//! Core domain types for tracklore
//!
//! These types represent the canonical data model (Layer 1) that normalizes
//! rows from a raw streaming-history export.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **RawRow** | One line of the export, all fields still text (Layer 0) |
//! | **PlayEvent** | One logged play of a track, typed and validated (Layer 1) |
//! | **PlayedAt** | The moment a play started; valid, or explicitly invalid |
//! | **Report** | A computed table of metrics over a batch of events (Layer 2) |
//!
//! ### Valid vs Invalid timestamps
//!
//! The export's `ts` field is the one column that is malformed often enough to
//! matter. A row with an unparsable timestamp is still a real play, so it is
//! kept — but its timestamp is [`PlayedAt::Invalid`] with the original text
//! preserved, and every time-bucketed computation excludes it and counts the
//! exclusion. A timestamp is never a half-parsed value treated as valid.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================
// Raw export rows (Layer 0)
// ============================================

/// Column names of the raw export, in file order.
pub const EXPORT_COLUMNS: [&str; 12] = [
    "spotify_track_uri",
    "ts",
    "platform",
    "ms_played",
    "len",
    "track_name",
    "artist_name",
    "album_name",
    "reason_start",
    "reason_end",
    "shuffle",
    "skipped",
];

/// One row of the raw export with every field still in text form.
///
/// Field names follow the export schema verbatim so that a row can be
/// reconstructed from a [`PlayEvent`] for the pass-through columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Opaque track identifier
    pub spotify_track_uri: String,
    /// Play start time, `DD/MM/YY HH24:MI`
    pub ts: String,
    /// Free-text playback client label (may be empty)
    pub platform: String,
    /// Milliseconds actually played
    pub ms_played: String,
    /// Nominal track length in seconds
    pub len: String,
    /// Track title
    pub track_name: String,
    /// Artist name
    pub artist_name: String,
    /// Album title (may be empty)
    pub album_name: String,
    /// Cause code for how the play started ("autoplay", "clickrow", ...)
    pub reason_start: String,
    /// Cause code for how the play ended ("trackdone", "fwdbtn", ...)
    pub reason_end: String,
    /// `"TRUE"` or `"FALSE"`
    pub shuffle: String,
    /// `"TRUE"` or `"FALSE"`
    pub skipped: String,
}

impl RawRow {
    /// Build a row from export cells in column order.
    ///
    /// Returns `None` when the slice does not have exactly
    /// [`EXPORT_COLUMNS`]`.len()` cells.
    pub fn from_cells(cells: &[&str]) -> Option<Self> {
        if cells.len() != EXPORT_COLUMNS.len() {
            return None;
        }
        Some(Self {
            spotify_track_uri: cells[0].to_string(),
            ts: cells[1].to_string(),
            platform: cells[2].to_string(),
            ms_played: cells[3].to_string(),
            len: cells[4].to_string(),
            track_name: cells[5].to_string(),
            artist_name: cells[6].to_string(),
            album_name: cells[7].to_string(),
            reason_start: cells[8].to_string(),
            reason_end: cells[9].to_string(),
            shuffle: cells[10].to_string(),
            skipped: cells[11].to_string(),
        })
    }

    /// Check whether this row is the export's header line.
    pub fn is_header(&self) -> bool {
        self.spotify_track_uri == EXPORT_COLUMNS[0]
            && self.ts == EXPORT_COLUMNS[1]
            && self.ms_played == EXPORT_COLUMNS[3]
    }
}

// ============================================
// Timestamps
// ============================================

/// The moment a play started.
///
/// The export's timestamp column is either a parsable local time or garbage;
/// this type keeps the two cases distinguishable instead of collapsing bad
/// values into a sentinel. The invalid arm retains the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayedAt {
    /// Parsed successfully from `DD/MM/YY HH24:MI`
    Valid { at: NaiveDateTime },
    /// Did not match the export format; original text preserved
    Invalid { raw: String },
}

impl PlayedAt {
    /// The parsed time, if this timestamp is valid.
    pub fn valid(&self) -> Option<NaiveDateTime> {
        match self {
            PlayedAt::Valid { at } => Some(*at),
            PlayedAt::Invalid { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, PlayedAt::Valid { .. })
    }
}

// ============================================
// Play events (Layer 1)
// ============================================

/// One logged instance of a track being played.
///
/// Created once by normalization, read many times by reports, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    /// Opaque identifier, not required unique
    pub track_uri: String,
    /// When the play started (valid or explicitly invalid)
    pub played_at: PlayedAt,
    /// Playback client label, free text, may be empty
    pub platform: String,
    /// Milliseconds actually played
    pub ms_played: u64,
    /// Nominal full track length in seconds; may be 0
    pub track_duration_secs: u32,
    /// Track title
    pub track_name: String,
    /// Artist name
    pub artist_name: String,
    /// Album title, may be empty
    pub album_name: String,
    /// Cause code for how the play started
    pub reason_start: String,
    /// Cause code for how the play ended
    pub reason_end: String,
    /// Shuffle mode was on
    pub shuffle: bool,
    /// The play was skipped
    pub skipped: bool,
}

impl PlayEvent {
    /// The hour of day (0-23) this play started, when the timestamp is valid.
    pub fn hour(&self) -> Option<u32> {
        use chrono::Timelike;
        self.played_at.valid().map(|at| at.hour())
    }

    /// The calendar date this play started, when the timestamp is valid.
    pub fn date(&self) -> Option<chrono::NaiveDate> {
        self.played_at.valid().map(|at| at.date())
    }

    /// Grouping key identifying a track: title plus artist.
    ///
    /// Titles collide across artists, so the catalogue never ranks by title
    /// alone.
    pub fn track_key(&self) -> (String, String) {
        (self.track_name.clone(), self.artist_name.clone())
    }
}
