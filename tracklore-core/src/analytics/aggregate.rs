//! Aggregation primitives
//!
//! The report catalogue is built out of a small set of composable pieces:
//! grouping, fold-style reducers, guarded ratios, ranking, and shares of a
//! total. Every primitive is a pure function over borrowed events; empty
//! input yields zeroed or undefined results, never an error.
//!
//! ## Ordering and ties
//!
//! Groups are always produced in ascending key order, and [`top_n`] uses a
//! stable descending sort on the ranking metric. Together this fixes the tie
//! rule everywhere: equal metrics resolve by ascending grouping key, then by
//! insertion order. Nothing depends on incidental iteration order.

use crate::types::PlayEvent;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

// ============================================
// Grouping
// ============================================

/// One group of events sharing a key.
#[derive(Debug)]
pub struct Group<'a, K> {
    /// The grouping key
    pub key: K,
    /// Events in the group, in input order
    pub events: Vec<&'a PlayEvent>,
}

/// Partition events by a computed key, ascending key order.
pub fn group_by<'a, K, F>(events: &'a [PlayEvent], key_fn: F) -> Vec<Group<'a, K>>
where
    K: Ord,
    F: Fn(&PlayEvent) -> K,
{
    let mut map: BTreeMap<K, Vec<&'a PlayEvent>> = BTreeMap::new();
    for event in events {
        map.entry(key_fn(event)).or_default().push(event);
    }
    map.into_iter()
        .map(|(key, events)| Group { key, events })
        .collect()
}

// ============================================
// Reducers
// ============================================

/// Number of events in a group.
pub fn count(events: &[&PlayEvent]) -> u64 {
    events.len() as u64
}

/// Total milliseconds played across a group.
pub fn sum_ms(events: &[&PlayEvent]) -> u64 {
    events.iter().map(|e| e.ms_played).sum()
}

/// Mean milliseconds played; 0.0 for an empty group.
pub fn avg_ms(events: &[&PlayEvent]) -> f64 {
    if events.is_empty() {
        0.0
    } else {
        sum_ms(events) as f64 / events.len() as f64
    }
}

/// Largest single play duration; 0 for an empty group.
pub fn max_ms(events: &[&PlayEvent]) -> u64 {
    events.iter().map(|e| e.ms_played).max().unwrap_or(0)
}

/// Number of events satisfying a predicate.
pub fn count_where<F>(events: &[&PlayEvent], pred: F) -> u64
where
    F: Fn(&PlayEvent) -> bool,
{
    events.iter().filter(|e| pred(e)).count() as u64
}

/// Number of distinct values of a computed key across events.
pub fn distinct<K, F>(events: &[&PlayEvent], key_fn: F) -> u64
where
    K: Ord,
    F: Fn(&PlayEvent) -> K,
{
    let mut seen = std::collections::BTreeSet::new();
    for event in events {
        seen.insert(key_fn(event));
    }
    seen.len() as u64
}

// ============================================
// Percentages
// ============================================

/// A ratio rendered as a percentage, or explicitly undefined.
///
/// A zero denominator never faults and never leaks a numeric sentinel; it
/// produces `Undefined`, which displays as the word `undefined`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Percent {
    Value(f64),
    Undefined,
}

impl Percent {
    /// `100 * numerator / denominator`, rounded to `decimals` places.
    pub fn ratio(numerator: f64, denominator: f64, decimals: u32) -> Percent {
        if denominator == 0.0 {
            Percent::Undefined
        } else {
            Percent::Value(round_to(100.0 * numerator / denominator, decimals))
        }
    }

    /// Convenience for count-based rates.
    pub fn of_counts(numerator: u64, denominator: u64, decimals: u32) -> Percent {
        Percent::ratio(numerator as f64, denominator as f64, decimals)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Percent::Undefined)
    }

    /// The numeric value, if defined.
    pub fn value(&self) -> Option<f64> {
        match self {
            Percent::Value(v) => Some(*v),
            Percent::Undefined => None,
        }
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Percent::Value(v) => write!(f, "{}", v),
            Percent::Undefined => write!(f, "undefined"),
        }
    }
}

/// Round half-away-from-zero to a number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Share of the grand total for each value, rounded last.
///
/// Over any non-empty partition the results sum to 100.0 within rounding
/// tolerance. A zero grand total makes every share undefined.
pub fn percent_of_total(values: &[f64], decimals: u32) -> Vec<Percent> {
    let total: f64 = values.iter().sum();
    values
        .iter()
        .map(|v| Percent::ratio(*v, total, decimals))
        .collect()
}

/// Milliseconds played as a percentage of the track's nominal length.
///
/// Undefined for zero-length tracks. Raw data may report more play time than
/// the track lasts; values above 100 are returned as-is.
pub fn percent_played(event: &PlayEvent, decimals: u32) -> Percent {
    Percent::ratio(
        event.ms_played as f64,
        event.track_duration_secs as f64 * 1000.0,
        decimals,
    )
}

// ============================================
// Ranking
// ============================================

/// Take the top `n` entries by a metric, descending.
///
/// The input must already be in ascending key order (as produced by
/// [`group_by`]); the stable sort then breaks metric ties by ascending key,
/// then insertion order. Returns `min(n, entries.len())` entries.
pub fn top_n<T, M, F>(mut entries: Vec<T>, metric: F, n: usize) -> Vec<T>
where
    M: PartialOrd,
    F: Fn(&T) -> M,
{
    entries.sort_by(|a, b| {
        metric(b)
            .partial_cmp(&metric(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(n);
    entries
}
