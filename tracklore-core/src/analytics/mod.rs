//! Analytics module for tracklore
//!
//! Provides aggregate statistics over normalized play events:
//! - Composable aggregation primitives (grouping, reducers, guarded ratios,
//!   ranking, time bucketing)
//! - The report catalogue and its registry
//! - Listening summaries (year/month in review)
//!
//! ## Design
//!
//! The catalogue is deliberately thin: every report is a short composition of
//! the primitives in [`aggregate`] and [`time`], so percentage rounding, the
//! tie-break rule and invalid-timestamp accounting are implemented once.
//! Reports are pure functions of the event batch; running one never affects
//! another, and a batch runner may compute them in any order or in parallel.

pub mod aggregate;
pub mod catalogue;
pub mod registry;
pub mod report;
pub mod summary;
pub mod time;

pub use aggregate::{
    avg_ms, count, count_where, distinct, group_by, max_ms, percent_of_total, percent_played,
    round_to, sum_ms, top_n, Group, Percent,
};
pub use registry::{list_reports, run_all, run_report, ReportDescriptor, ReportKind};
pub use report::{Cell, Report, ReportOptions};
pub use summary::{
    listening_summary, ListeningSummary, PeriodTotals, SummaryConfig, SummaryPeriod,
    TrendComparison,
};
pub use time::{bucket_by_time, Granularity, TimeBucket, TimeBuckets, TimeKey};
