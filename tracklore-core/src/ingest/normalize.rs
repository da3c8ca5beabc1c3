//! Row normalization
//!
//! Converts a [`RawRow`] (Layer 0, all text) into a typed [`PlayEvent`]
//! (Layer 1). The transform is pure: no I/O, input untouched.
//!
//! # Error Handling
//!
//! - **Non-numeric `ms_played` / `len`**: fails the row with
//!   [`NormalizeError::BadNumeric`].
//! - **Booleans other than `TRUE`/`FALSE`** (case-sensitive, matching the
//!   export): fails the row with [`NormalizeError::BadBoolean`].
//! - **Unparsable `ts`**: does NOT fail the row. The event is kept with
//!   [`PlayedAt::Invalid`] and the original text, so one bad timestamp
//!   disables time bucketing for that event only, not the whole batch.
//! - **Empty optional text** (album, platform): kept as empty strings.

use crate::error::NormalizeError;
use crate::types::{PlayEvent, PlayedAt, RawRow};
use chrono::NaiveDateTime;

/// Timestamp layout of the raw export: `DD/MM/YY HH24:MI`.
const TS_FORMAT: &str = "%d/%m/%y %H:%M";

/// Normalize one raw row into a typed play event.
pub fn normalize(raw: &RawRow) -> Result<PlayEvent, NormalizeError> {
    let ms_played = parse_u64("ms_played", &raw.ms_played)?;
    let track_duration_secs = parse_u32("len", &raw.len)?;
    let shuffle = parse_bool("shuffle", &raw.shuffle)?;
    let skipped = parse_bool("skipped", &raw.skipped)?;

    let played_at = match parse_played_at(&raw.ts) {
        Ok(at) => PlayedAt::Valid { at },
        Err(NormalizeError::BadTimestamp { raw }) => PlayedAt::Invalid { raw },
        Err(other) => return Err(other),
    };

    Ok(PlayEvent {
        track_uri: raw.spotify_track_uri.clone(),
        played_at,
        platform: raw.platform.clone(),
        ms_played,
        track_duration_secs,
        track_name: raw.track_name.clone(),
        artist_name: raw.artist_name.clone(),
        album_name: raw.album_name.clone(),
        reason_start: raw.reason_start.clone(),
        reason_end: raw.reason_end.clone(),
        shuffle,
        skipped,
    })
}

/// Parse the export timestamp format.
///
/// Two-digit years map into 2000-2068 per chrono's `%y` pivot, which covers
/// every year the streaming service has existed.
pub fn parse_played_at(text: &str) -> Result<NaiveDateTime, NormalizeError> {
    NaiveDateTime::parse_from_str(text.trim(), TS_FORMAT).map_err(|_| {
        NormalizeError::BadTimestamp {
            raw: text.to_string(),
        }
    })
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, NormalizeError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| NormalizeError::BadNumeric {
            field,
            value: value.to_string(),
        })
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, NormalizeError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| NormalizeError::BadNumeric {
            field,
            value: value.to_string(),
        })
}

/// The export writes booleans as uppercase words; nothing else is accepted.
fn parse_bool(field: &'static str, value: &str) -> Result<bool, NormalizeError> {
    match value {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        other => Err(NormalizeError::BadBoolean {
            field,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn raw() -> RawRow {
        RawRow {
            spotify_track_uri: "spotify:track:abc".to_string(),
            ts: "14/05/25 23:10".to_string(),
            platform: "android".to_string(),
            ms_played: "5000".to_string(),
            len: "30".to_string(),
            track_name: "Song".to_string(),
            artist_name: "Band".to_string(),
            album_name: "Album".to_string(),
            reason_start: "clickrow".to_string(),
            reason_end: "trackdone".to_string(),
            shuffle: "FALSE".to_string(),
            skipped: "TRUE".to_string(),
        }
    }

    #[test]
    fn test_normalize_valid_row() {
        let event = normalize(&raw()).expect("valid row");
        let at = event.played_at.valid().expect("valid timestamp");
        assert_eq!(at.year(), 2025);
        assert_eq!(at.month(), 5);
        assert_eq!(at.day(), 14);
        assert_eq!(at.hour(), 23);
        assert_eq!(at.minute(), 10);
        assert_eq!(event.ms_played, 5000);
        assert_eq!(event.track_duration_secs, 30);
        assert!(!event.shuffle);
        assert!(event.skipped);
    }

    #[test]
    fn test_pass_through_strings_round_trip() {
        let input = raw();
        let event = normalize(&input).expect("valid row");
        assert_eq!(event.track_uri, input.spotify_track_uri);
        assert_eq!(event.platform, input.platform);
        assert_eq!(event.track_name, input.track_name);
        assert_eq!(event.artist_name, input.artist_name);
        assert_eq!(event.album_name, input.album_name);
        assert_eq!(event.reason_start, input.reason_start);
        assert_eq!(event.reason_end, input.reason_end);
    }

    #[test]
    fn test_bad_timestamp_keeps_row() {
        let mut input = raw();
        input.ts = "garbage".to_string();
        let event = normalize(&input).expect("row is kept");
        assert_eq!(
            event.played_at,
            PlayedAt::Invalid {
                raw: "garbage".to_string()
            }
        );
        // The rest of the row still normalized
        assert_eq!(event.ms_played, 5000);
    }

    #[test]
    fn test_bad_numeric_fails_row() {
        let mut input = raw();
        input.ms_played = "lots".to_string();
        let err = normalize(&input).expect_err("row must fail");
        assert_eq!(
            err,
            NormalizeError::BadNumeric {
                field: "ms_played",
                value: "lots".to_string()
            }
        );

        let mut input = raw();
        input.len = "-5".to_string();
        assert!(matches!(
            normalize(&input),
            Err(NormalizeError::BadNumeric { field: "len", .. })
        ));
    }

    #[test]
    fn test_bad_boolean_fails_row() {
        let mut input = raw();
        input.shuffle = "true".to_string();
        let err = normalize(&input).expect_err("lowercase is rejected");
        assert_eq!(
            err,
            NormalizeError::BadBoolean {
                field: "shuffle",
                value: "true".to_string()
            }
        );
    }

    #[test]
    fn test_empty_optional_fields_accepted() {
        let mut input = raw();
        input.album_name = String::new();
        input.platform = String::new();
        let event = normalize(&input).expect("optional fields may be empty");
        assert_eq!(event.album_name, "");
        assert_eq!(event.platform, "");
    }
}
