//! Walk driver: seeds the queue with the root and collects the report.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use extwalk_core::{ScanError, WalkConfig, WalkReport};
use tracing::info;

use crate::filter::EntryFilter;
use crate::queue::WorkQueue;
use crate::task::Task;

/// Parallel walker that groups every regular file under a root by extension.
#[derive(Debug, Clone)]
pub struct Walker {
    config: WalkConfig,
}

impl Walker {
    /// Create a walker for the given configuration.
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    /// Configuration this walker runs with.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Walk the configured root to quiescence.
    ///
    /// Fails only when the root itself is unusable or the configuration is
    /// invalid. Problems below the root are collected as warnings.
    pub fn walk(&self) -> Result<WalkReport, ScanError> {
        let start = Instant::now();
        let root = normalize_root(&self.config.root)?;

        // Fail before any worker is spawned
        std::fs::symlink_metadata(&root).map_err(|e| ScanError::io(&root, e))?;

        let filter = EntryFilter::from_config(&self.config)?;
        let threads = self.config.effective_threads();
        let queue = WorkQueue::with_filter(threads, filter)?;

        info!(root = %root.display(), threads, "Starting walk");
        queue.enqueue(Task::root(root.clone()));
        let outcome = queue.join();

        let duration = start.elapsed();
        info!(
            files = outcome.stats.files,
            directories = outcome.stats.directories,
            warnings = outcome.warnings.len(),
            elapsed_ms = elapsed_millis(duration),
            "Walk complete"
        );

        Ok(WalkReport::new(
            root,
            self.config.clone(),
            outcome.groups,
            outcome.stats,
            duration,
            outcome.warnings,
        ))
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn elapsed_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Make a root path absolute and drop trailing separators and `.` segments.
///
/// Symlinks are not resolved, so reported paths keep the prefix the caller
/// gave.
pub fn normalize_root(path: &Path) -> Result<PathBuf, ScanError> {
    if path.as_os_str().is_empty() {
        return Err(ScanError::InvalidConfig {
            message: "Root path cannot be empty".to_string(),
        });
    }

    let absolute = std::path::absolute(path).map_err(|e| ScanError::io(path, e))?;
    Ok(absolute.components().collect())
}
