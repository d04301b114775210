//! Dynamic work queue and parallel walk engine for extwalk.
//!
//! # Overview
//!
//! `extwalk-scan` walks a directory tree with a fixed pool of worker
//! threads whose work set grows as directories are discovered:
//!
//! - **[`WorkQueue`]** runs [`Task`]s on the pool and tracks outstanding
//!   work, so [`WorkQueue::join`] returns exactly when nothing is queued or
//!   executing.
//! - **[`Task`]** is either a path classification or a directory
//!   expansion. Each may enqueue further tasks into the queue running it.
//! - **[`ResultSink`]** collects regular files grouped by extension.
//! - **[`Walker`]** seeds the queue with the root and assembles the
//!   [`WalkReport`].
//!
//! # Example
//!
//! ```rust,no_run
//! use extwalk_scan::{WalkConfig, Walker};
//!
//! let report = Walker::new(WalkConfig::new("/path/to/walk")).walk().unwrap();
//!
//! for (key, paths) in report.groups.iter() {
//!     println!("{key}: {} files", paths.len());
//! }
//! ```
//!
//! Driving the queue directly:
//!
//! ```rust,no_run
//! use extwalk_scan::{Task, WorkQueue};
//!
//! let queue = WorkQueue::new(8).unwrap();
//! queue.enqueue(Task::root("/path/to/walk"));
//! let report = queue.join();
//! println!("{} files", report.groups.total_files());
//! ```

mod filter;
mod queue;
mod sink;
mod task;
mod walker;

pub use filter::EntryFilter;
pub use queue::{QueueHandle, QueueReport, WorkQueue};
pub use sink::ResultSink;
pub use task::Task;
pub use walker::{Walker, normalize_root};

// Re-export core types for convenience
pub use extwalk_core::{
    GroupKey, Grouping, ScanError, ScanWarning, WalkConfig, WalkReport, WalkStats, WarningKind,
};
