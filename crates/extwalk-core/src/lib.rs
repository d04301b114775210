//! Core types for extwalk.
//!
//! This crate provides the data structures shared by the walk engine and
//! the command line front end: walk configuration, error and warning types,
//! the extension grouping result and walk statistics.

mod config;
mod error;
mod group;
mod report;
mod stats;

pub use config::{DEFAULT_THREADS, WalkConfig, WalkConfigBuilder};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use group::{GroupKey, Grouping};
pub use report::WalkReport;
pub use stats::WalkStats;
