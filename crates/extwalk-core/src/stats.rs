//! Walk statistics.

use serde::{Deserialize, Serialize};

/// Counters collected by the work queue over one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Tasks admitted to the queue.
    pub tasks_enqueued: u64,
    /// Tasks whose execution returned, successfully or not.
    pub tasks_completed: u64,
    /// Tasks that returned an error or panicked.
    pub tasks_failed: u64,
    /// Regular files recorded.
    pub files: u64,
    /// Directories expanded.
    pub directories: u64,
    /// Paths that were neither file nor directory, or were filtered out.
    pub skipped: u64,
}

impl WalkStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks that finished without error.
    pub fn tasks_succeeded(&self) -> u64 {
        self.tasks_completed.saturating_sub(self.tasks_failed)
    }
}
