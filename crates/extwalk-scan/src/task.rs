//! Units of work executed by the queue.
//!
//! Depth is reached by chaining enqueues rather than recursion:
//! classifying a directory enqueues its expansion, and expanding a directory
//! enqueues a classification for every child. Worker stack depth stays
//! constant however deep the tree is.

use std::fs;
use std::path::{Path, PathBuf};

use extwalk_core::{GroupKey, ScanError, ScanWarning};
use tracing::debug;

use crate::queue::QueueHandle;
use crate::sink::ResultSink;

/// A schedulable unit of work.
///
/// Tasks carry only their own data; the queue and sink are handed to
/// [`execute`](Task::execute) by the worker that runs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Determine whether a path is a directory or a regular file.
    ClassifyPath { path: PathBuf, depth: u32 },
    /// List the immediate children of a directory.
    ExpandDirectory { path: PathBuf, depth: u32 },
}

impl Task {
    /// Classification task for the walk root.
    pub fn root(path: impl Into<PathBuf>) -> Self {
        Self::ClassifyPath {
            path: path.into(),
            depth: 0,
        }
    }

    /// Path this task operates on.
    pub fn path(&self) -> &Path {
        match self {
            Self::ClassifyPath { path, .. } | Self::ExpandDirectory { path, .. } => path,
        }
    }

    /// Depth of the path below the walk root.
    pub fn depth(&self) -> u32 {
        match self {
            Self::ClassifyPath { depth, .. } | Self::ExpandDirectory { depth, .. } => *depth,
        }
    }

    /// Run the task, possibly enqueuing follow-up work or recording a file.
    pub fn execute(self, queue: &QueueHandle, sink: &ResultSink) -> Result<(), ScanError> {
        match self {
            Self::ClassifyPath { path, depth } => classify(path, depth, queue, sink),
            Self::ExpandDirectory { path, depth } => expand(path, depth, queue),
        }
    }
}

fn classify(
    path: PathBuf,
    depth: u32,
    queue: &QueueHandle,
    sink: &ResultSink,
) -> Result<(), ScanError> {
    let metadata = if queue.filter().follow_symlinks() {
        fs::metadata(&path)
    } else {
        fs::symlink_metadata(&path)
    }
    .map_err(|e| ScanError::io(&path, e))?;

    let file_type = metadata.file_type();
    if file_type.is_dir() {
        queue.enqueue(Task::ExpandDirectory { path, depth });
    } else if file_type.is_file() {
        let key = GroupKey::for_path(&path);
        sink.append(key, path);
        queue.counters().record_file();
    } else {
        debug!(path = %path.display(), "Skipping special file");
        queue.counters().record_skipped();
    }

    Ok(())
}

fn expand(path: PathBuf, depth: u32, queue: &QueueHandle) -> Result<(), ScanError> {
    let child_depth = depth + 1;
    if queue.filter().exceeds_depth(child_depth) {
        debug!(path = %path.display(), depth, "Depth limit reached");
        queue.counters().record_skipped();
        return Ok(());
    }

    let entries = fs::read_dir(&path).map_err(|e| ScanError::io(&path, e))?;
    queue.counters().record_directory();

    let mut admitted = 0usize;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                queue.record_warning(ScanWarning::read_error(&path, &err));
                continue;
            }
        };

        if queue.filter().should_skip(&entry.file_name().to_string_lossy()) {
            queue.counters().record_skipped();
            continue;
        }

        queue.enqueue(Task::ClassifyPath {
            path: entry.path(),
            depth: child_depth,
        });
        admitted += 1;
    }

    debug!(path = %path.display(), children = admitted, "Expanded directory");
    Ok(())
}
