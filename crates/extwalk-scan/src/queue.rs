//! Dynamic work queue with quiescence-based completion.
//!
//! Pending tasks sit in an unbounded channel drained by a fixed pool of
//! worker threads. Admission never blocks, so a task running on a worker
//! may enqueue follow-up work into its own pool.
//!
//! Completion is tracked by a single outstanding-work counter guarded by a
//! mutex and paired with a condition variable:
//!
//! - [`QueueHandle::enqueue`] increments the counter before the task is
//!   visible to any worker.
//! - A worker decrements it only after `execute` has fully returned,
//!   including any enqueues the task made.
//! - [`WorkQueue::join`] waits until the counter reaches zero, then closes
//!   the queue. Admission after that panics.
//!
//! A parent's decrement therefore always follows its children's
//! increments, and the counter cannot pass through a transient zero while
//! work remains.
//!
//! The counter lock and the result sink lock are never held together.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, unbounded};
use extwalk_core::{Grouping, ScanError, ScanWarning, WalkStats};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, warn};

use crate::filter::EntryFilter;
use crate::sink::ResultSink;
use crate::task::Task;

/// Message consumed by workers.
enum Job {
    Run(Task),
    Stop,
}

/// Counters updated by workers and tasks.
#[derive(Debug, Default)]
pub(crate) struct QueueCounters {
    enqueued: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    files: AtomicU64,
    directories: AtomicU64,
    skipped: AtomicU64,
}

impl QueueCounters {
    pub(crate) fn record_file(&self) {
        self.files.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_directory(&self) {
        self.directories.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> WalkStats {
        WalkStats {
            tasks_enqueued: self.enqueued.load(Ordering::Relaxed),
            tasks_completed: self.completed.load(Ordering::Relaxed),
            tasks_failed: self.failed.load(Ordering::Relaxed),
            files: self.files.load(Ordering::Relaxed),
            directories: self.directories.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Admission state, guarded by one lock.
#[derive(Debug, Default)]
struct State {
    /// Outstanding work: queued plus executing.
    pending: usize,
    /// Set by `join` once the queue is quiescent.
    closed: bool,
}

struct Shared {
    sender: Sender<Job>,
    receiver: Receiver<Job>,

    state: Mutex<State>,
    quiescent: Condvar,

    sink: ResultSink,
    filter: EntryFilter,
    counters: QueueCounters,
    warnings: Mutex<Vec<ScanWarning>>,
}

/// Cloneable admission handle passed to executing tasks.
#[derive(Clone)]
pub struct QueueHandle {
    shared: Arc<Shared>,
}

impl QueueHandle {
    /// Admit a task. Never blocks.
    ///
    /// # Panics
    ///
    /// Panics if the owning queue has already been joined.
    pub fn enqueue(&self, task: Task) {
        {
            let mut state = self.shared.state.lock();
            assert!(!state.closed, "task enqueued after join");
            state.pending += 1;
        }
        self.shared.counters.enqueued.fetch_add(1, Ordering::Relaxed);

        // The shared receiver keeps the channel open for the queue's lifetime.
        if self.shared.sender.send(Job::Run(task)).is_err() {
            unreachable!("work channel closed while the queue is alive");
        }
    }

    /// Outstanding work: tasks queued plus tasks executing.
    pub fn outstanding(&self) -> usize {
        self.shared.state.lock().pending
    }

    /// Filter applied to discovered children.
    pub fn filter(&self) -> &EntryFilter {
        &self.shared.filter
    }

    pub(crate) fn counters(&self) -> &QueueCounters {
        &self.shared.counters
    }

    pub(crate) fn record_warning(&self, warning: ScanWarning) {
        warn!(path = %warning.path.display(), "{}", warning.message);
        self.shared.warnings.lock().push(warning);
    }

    /// Wait for quiescence and refuse any further admission.
    fn close(&self) {
        let mut state = self.shared.state.lock();
        while state.pending > 0 {
            self.shared.quiescent.wait(&mut state);
        }
        state.closed = true;
    }

    fn complete(&self) {
        let mut state = self.shared.state.lock();
        assert!(
            state.pending > 0,
            "outstanding-work counter underflow: task completed more than once"
        );
        state.pending -= 1;
        if state.pending == 0 {
            self.shared.quiescent.notify_all();
        }
    }

    /// Execute one task, absorbing its failure so the walk keeps going.
    fn run(&self, task: Task) {
        let path = task.path().to_path_buf();
        debug!(?task, "Executing task");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            task.execute(self, &self.shared.sink)
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                self.record_warning(ScanWarning::from_error(&path, &err));
            }
            Err(payload) => {
                self.shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                let message = panic_message(payload.as_ref());
                error!(path = %path.display(), %message, "Task panicked");
                self.shared
                    .warnings
                    .lock()
                    .push(ScanWarning::task_panicked(path, &message));
            }
        }

        self.shared.counters.completed.fetch_add(1, Ordering::Relaxed);
        self.complete();
    }
}

/// Everything a queue produced, returned by [`WorkQueue::join`].
#[derive(Debug, Clone)]
pub struct QueueReport {
    /// Files grouped by extension.
    pub groups: Grouping,
    /// Task and entry counters.
    pub stats: WalkStats,
    /// Non-fatal problems, one per failed task or unreadable entry.
    pub warnings: Vec<ScanWarning>,
}

/// Fixed-size worker pool fed by a dynamically growing task set.
pub struct WorkQueue {
    handle: QueueHandle,
    workers: Vec<JoinHandle<()>>,
}

impl WorkQueue {
    /// Create a queue with `worker_count` workers and no entry filtering.
    pub fn new(worker_count: usize) -> Result<Self, ScanError> {
        Self::with_filter(worker_count, EntryFilter::default())
    }

    /// Create a queue whose tasks apply `filter` to discovered children.
    pub fn with_filter(worker_count: usize, filter: EntryFilter) -> Result<Self, ScanError> {
        if worker_count == 0 {
            return Err(ScanError::InvalidConfig {
                message: "worker count must be positive".to_string(),
            });
        }

        let (sender, receiver) = unbounded();
        let handle = QueueHandle {
            shared: Arc::new(Shared {
                sender,
                receiver,
                state: Mutex::new(State::default()),
                quiescent: Condvar::new(),
                sink: ResultSink::new(),
                filter,
                counters: QueueCounters::default(),
                warnings: Mutex::new(Vec::new()),
            }),
        };

        let mut queue = Self {
            handle,
            workers: Vec::with_capacity(worker_count),
        };

        for id in 0..worker_count {
            let handle = queue.handle.clone();
            let worker = thread::Builder::new()
                .name(format!("extwalk-worker-{id}"))
                .spawn(move || worker_loop(id, handle))
                .map_err(|source| ScanError::WorkerSpawn { source })?;
            queue.workers.push(worker);
        }

        Ok(queue)
    }

    /// Admit a task. Never blocks.
    pub fn enqueue(&self, task: Task) {
        self.handle.enqueue(task);
    }

    /// Admission handle that can be shared with other threads.
    pub fn handle(&self) -> QueueHandle {
        self.handle.clone()
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Block until no task is queued or executing, then stop the workers
    /// and return the results.
    pub fn join(mut self) -> QueueReport {
        self.handle.close();
        self.shutdown();

        let shared = &self.handle.shared;
        QueueReport {
            groups: shared.sink.snapshot(),
            stats: shared.counters.snapshot(),
            warnings: std::mem::take(&mut *shared.warnings.lock()),
        }
    }

    fn shutdown(&mut self) {
        for _ in &self.workers {
            let _ = self.handle.shared.sender.send(Job::Stop);
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("Worker thread panicked outside of a task");
            }
        }
    }
}

impl Drop for WorkQueue {
    fn drop(&mut self) {
        // Dropped without join: tell the workers to stop but do not wait.
        for _ in self.workers.drain(..) {
            let _ = self.handle.shared.sender.send(Job::Stop);
        }
    }
}

fn worker_loop(id: usize, handle: QueueHandle) {
    debug!(worker = id, "Worker started");

    while let Ok(Job::Run(task)) = handle.shared.receiver.recv() {
        handle.run(task);
    }

    debug!(worker = id, "Worker stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
