//! Thread-safe accumulator for grouped walk results.

use std::path::PathBuf;

use extwalk_core::{GroupKey, Grouping};
use parking_lot::Mutex;

/// Shared result sink appended to by every worker.
///
/// The grouping is only reachable through [`append`](Self::append) and
/// [`snapshot`](Self::snapshot), so every mutation goes through the lock.
/// Groups are append-only for the lifetime of a walk.
#[derive(Debug, Default)]
pub struct ResultSink {
    groups: Mutex<Grouping>,
}

impl ResultSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to its group, creating the group on first use.
    pub fn append(&self, key: GroupKey, path: PathBuf) {
        self.groups.lock().push(key, path);
    }

    /// Copy of the current contents.
    ///
    /// Meant to be read once the owning queue is quiescent.
    pub fn snapshot(&self) -> Grouping {
        self.groups.lock().clone()
    }

    /// Consume the sink and return its contents.
    pub fn into_grouping(self) -> Grouping {
        self.groups.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_append_creates_group() {
        let sink = ResultSink::new();
        sink.append(GroupKey::extension("txt"), PathBuf::from("/r/a.txt"));
        sink.append(GroupKey::extension("txt"), PathBuf::from("/r/b.txt"));

        let groups = sink.snapshot();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups.get(&GroupKey::extension("txt")).unwrap(),
            &[PathBuf::from("/r/a.txt"), PathBuf::from("/r/b.txt")]
        );
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let sink = Arc::new(ResultSink::new());

        let handles: Vec<_> = (0..16)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = if i % 2 == 0 {
                            GroupKey::extension("even")
                        } else {
                            GroupKey::NoExtension
                        };
                        sink.append(key, PathBuf::from(format!("/t{t}/{i}")));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let sink = Arc::into_inner(sink).unwrap();
        let groups = sink.into_grouping();
        assert_eq!(groups.total_files(), 16 * 500);
        assert_eq!(groups.counts()[&GroupKey::NoExtension], 16 * 250);
    }
}
