//! Entry filtering applied when a directory is expanded.

use extwalk_core::{ScanError, WalkConfig};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Decides which discovered children are admitted to the queue.
#[derive(Debug, Clone)]
pub struct EntryFilter {
    config: WalkConfig,
    ignore: GlobSet,
}

impl EntryFilter {
    /// Build a filter from a walk configuration, compiling its ignore globs.
    pub fn from_config(config: &WalkConfig) -> Result<Self, ScanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
                message: format!("invalid ignore pattern {pattern:?}: {e}"),
            })?;
            builder.add(glob);
        }
        let ignore = builder.build().map_err(|e| ScanError::InvalidConfig {
            message: e.to_string(),
        })?;

        Ok(Self {
            config: config.clone(),
            ignore,
        })
    }

    /// Whether classification resolves symbolic links.
    pub fn follow_symlinks(&self) -> bool {
        self.config.follow_symlinks
    }

    /// Check if a child with this file name should be skipped.
    pub fn should_skip(&self, name: &str) -> bool {
        self.config.should_skip_hidden(name) || self.ignore.is_match(name)
    }

    /// Check if children at `depth` lie beyond the depth limit.
    pub fn exceeds_depth(&self, depth: u32) -> bool {
        self.config.exceeds_depth(depth)
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            config: WalkConfig::default(),
            ignore: GlobSet::empty(),
        }
    }
}
