//! # tracklore-core
//!
//! Core library for tracklore - batch analytics over music-streaming history.
//!
//! This library provides:
//! - Domain types for raw export rows and normalized play events
//! - Row normalization with explicit invalid-timestamp handling
//! - Composable aggregation primitives and a fixed report catalogue
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Layer 0 (Raw):** Export files on disk, every field text (immutable)
//! - **Layer 1 (Canonical):** Normalized [`PlayEvent`] records; rows that
//!   fail normalization are kept as rejection records with their causes
//! - **Layer 2 (Derived):** Report tables and summaries (regenerable)
//!
//! ## Example
//!
//! ```rust,no_run
//! use tracklore_core::analytics::{run_all, ReportOptions};
//! use tracklore_core::ingest::Importer;
//!
//! let result = Importer::new()
//!     .import_file(std::path::Path::new("streaming_history.tsv"))
//!     .expect("failed to import export file");
//!
//! for report in run_all(&result.events, &ReportOptions::default()) {
//!     println!("{}: {} rows", report.title, report.rows.len());
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, NormalizeError, Result};
pub use ingest::{normalize, ImportResult, Importer, RejectedRow};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod types;
