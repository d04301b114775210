//! Completed walk container.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::WalkConfig;
use crate::error::ScanWarning;
use crate::group::Grouping;
use crate::stats::WalkStats;

/// Result of a finished walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkReport {
    /// Absolute root path that was walked.
    pub root: PathBuf,

    /// When the walk finished.
    pub walked_at: SystemTime,

    /// Wall-clock duration of the walk.
    pub duration: Duration,

    /// Configuration used.
    pub config: WalkConfig,

    /// Files grouped by extension.
    pub groups: Grouping,

    /// Task and entry counters.
    pub stats: WalkStats,

    /// Warnings encountered during the walk.
    pub warnings: Vec<ScanWarning>,
}

impl WalkReport {
    /// Create a new report stamped with the current time.
    pub fn new(
        root: PathBuf,
        config: WalkConfig,
        groups: Grouping,
        stats: WalkStats,
        duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            root,
            walked_at: SystemTime::now(),
            duration,
            config,
            groups,
            stats,
            warnings,
        }
    }

    /// Total number of files found.
    pub fn total_files(&self) -> usize {
        self.groups.total_files()
    }

    /// Check if there were any warnings during the walk.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
