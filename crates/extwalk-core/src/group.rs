//! Extension grouping keys and the grouped walk result.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key under which a discovered file is grouped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    /// Lower-cased extension, without the leading dot. Never empty.
    Extension(CompactString),
    /// The file name carries no usable extension.
    NoExtension,
}

impl GroupKey {
    /// Display form of [`GroupKey::NoExtension`].
    pub const NO_EXTENSION: &'static str = "<no-extension>";

    /// Compute the grouping key for a file path.
    ///
    /// The extension is the text after the last `.` of the final path
    /// segment. Names without a dot, names whose only dot is the leading
    /// one (`.gitignore`) and names ending in a dot (`notes.`) have no
    /// extension.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().map(|ext| ext.to_string_lossy()) {
            Some(ext) if !ext.is_empty() => Self::extension(&ext),
            _ => Self::NoExtension,
        }
    }

    /// Create an extension key, lower-casing it.
    pub fn extension(ext: &str) -> Self {
        if ext.is_empty() {
            Self::NoExtension
        } else {
            Self::Extension(CompactString::new(ext.to_lowercase()))
        }
    }

    /// Key as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Extension(ext) => ext.as_str(),
            Self::NoExtension => Self::NO_EXTENSION,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GroupKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == Self::NO_EXTENSION {
            Ok(Self::NoExtension)
        } else {
            Ok(Self::extension(&raw))
        }
    }
}

/// Files grouped by extension, in first-discovery order of the groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grouping {
    groups: IndexMap<GroupKey, Vec<PathBuf>>,
}

impl Grouping {
    /// Create an empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to a group, creating the group on first use.
    pub fn push(&mut self, key: GroupKey, path: PathBuf) {
        self.groups.entry(key).or_default().push(path);
    }

    /// Paths recorded under a key.
    pub fn get(&self, key: &GroupKey) -> Option<&[PathBuf]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterate over groups in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[PathBuf])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no file was recorded.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of files across all groups.
    pub fn total_files(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Number of files per group, keyed in sorted order.
    pub fn counts(&self) -> BTreeMap<GroupKey, usize> {
        self.groups
            .iter()
            .map(|(key, paths)| (key.clone(), paths.len()))
            .collect()
    }

    /// Copy with groups sorted by key and paths sorted within each group.
    pub fn sorted(&self) -> Self {
        let mut groups = self.groups.clone();
        groups.sort_keys();
        for paths in groups.values_mut() {
            paths.sort();
        }
        Self { groups }
    }
}

impl<'a> IntoIterator for &'a Grouping {
    type Item = (&'a GroupKey, &'a Vec<PathBuf>);
    type IntoIter = indexmap::map::Iter<'a, GroupKey, Vec<PathBuf>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
