use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use extwalk_scan::{GroupKey, Task, WalkConfig, Walker, WarningKind, WorkQueue};
use tempfile::TempDir;

/// R/a.txt, R/sub/b.TXT, R/sub/deep/c, R/empty/
fn create_scenario_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("sub/deep")).unwrap();
    fs::create_dir(root.join("empty")).unwrap();

    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("sub/b.TXT"), "b").unwrap();
    fs::write(root.join("sub/deep/c"), "c").unwrap();

    temp
}

/// A wider tree with files nested six levels deep.
fn create_deep_tree() -> (TempDir, Vec<PathBuf>) {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let mut files = Vec::new();

    for branch in ["left", "right", "middle"] {
        let mut dir = root.join(branch);
        for level in 0..6 {
            fs::create_dir_all(&dir).unwrap();
            for (i, ext) in ["rs", "md", "JSON"].iter().enumerate() {
                let file = dir.join(format!("f{level}_{i}.{ext}"));
                fs::write(&file, "x").unwrap();
                files.push(file);
            }
            let bare = dir.join(format!("LICENSE{level}"));
            fs::write(&bare, "x").unwrap();
            files.push(bare);

            dir = dir.join(format!("level{level}"));
        }
    }

    (temp, files)
}

fn walk(root: &Path, threads: usize) -> extwalk_scan::WalkReport {
    let config = WalkConfig::builder()
        .root(root)
        .threads(threads)
        .build()
        .unwrap();
    Walker::new(config).walk().unwrap()
}

#[test]
fn test_scenario_tree_grouping() {
    let temp = create_scenario_tree();
    let root = temp.path();
    let report = walk(root, 4);

    let txt: HashSet<_> = report
        .groups
        .get(&GroupKey::extension("txt"))
        .unwrap()
        .iter()
        .cloned()
        .collect();
    let expected: HashSet<_> = [root.join("a.txt"), root.join("sub/b.TXT")]
        .into_iter()
        .collect();
    assert_eq!(txt, expected);

    assert_eq!(
        report.groups.get(&GroupKey::NoExtension).unwrap(),
        &[root.join("sub/deep/c")]
    );
    assert_eq!(report.groups.len(), 2);
}

#[test]
fn test_scenario_tree_task_count() {
    let temp = create_scenario_tree();
    let report = walk(temp.path(), 2);

    // 1 root classify + 6 child classifies + 4 directory expansions
    assert_eq!(report.stats.tasks_enqueued, 11);
    assert_eq!(report.stats.tasks_completed, 11);
    assert_eq!(report.stats.tasks_failed, 0);
    assert_eq!(report.stats.files, 3);
    assert_eq!(report.stats.directories, 4);
}

#[test]
fn test_no_lost_or_duplicated_files() {
    let (temp, files) = create_deep_tree();
    let report = walk(temp.path(), 8);

    assert_eq!(report.total_files(), files.len());

    let found: Vec<PathBuf> = report
        .groups
        .iter()
        .flat_map(|(_, paths)| paths.iter().cloned())
        .collect();
    let unique: HashSet<_> = found.iter().cloned().collect();
    assert_eq!(unique.len(), found.len(), "duplicate paths in result");

    let expected: HashSet<_> = files.into_iter().collect();
    assert_eq!(unique, expected);
}

#[test]
fn test_grouping_edge_cases() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.TXT"), "").unwrap();
    fs::write(root.join("README"), "").unwrap();
    fs::write(root.join(".gitignore"), "").unwrap();

    let report = walk(root, 1);

    assert_eq!(
        report.groups.get(&GroupKey::extension("txt")).unwrap(),
        &[root.join("a.TXT")]
    );
    let mut bare = report.groups.get(&GroupKey::NoExtension).unwrap().to_vec();
    bare.sort();
    assert_eq!(bare, vec![root.join(".gitignore"), root.join("README")]);
}

#[test]
fn test_repeated_walks_are_consistent() {
    let (temp, files) = create_deep_tree();
    let baseline = walk(temp.path(), 1).groups.counts();
    assert_eq!(baseline.values().sum::<usize>(), files.len());

    for threads in [1, 4, 32] {
        for _ in 0..100 {
            let queue = WorkQueue::new(threads).unwrap();
            queue.enqueue(Task::root(temp.path()));
            let report = queue.join();

            assert_eq!(report.groups.counts(), baseline, "threads: {threads}");
            assert_eq!(report.stats.tasks_enqueued, report.stats.tasks_completed);
        }
    }
}

#[test]
fn test_empty_directory() {
    let temp = TempDir::new().unwrap();
    let report = walk(temp.path(), 4);

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.tasks_enqueued, 2);
    assert_eq!(report.stats.directories, 1);
}

#[test]
fn test_root_may_be_a_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("single.Log");
    fs::write(&file, "x").unwrap();

    let report = walk(&file, 4);
    assert_eq!(
        report.groups.get(&GroupKey::extension("log")).unwrap(),
        &[file]
    );
}

#[test]
fn test_trailing_separator_is_stripped() {
    let temp = create_scenario_tree();
    let with_slash = PathBuf::from(format!("{}/", temp.path().display()));

    let report = walk(&with_slash, 2);
    assert_eq!(report.root, temp.path());
    assert!(
        report
            .groups
            .get(&GroupKey::NoExtension)
            .unwrap()
            .iter()
            .all(|p| !p.to_string_lossy().contains("//"))
    );
}

#[test]
fn test_hidden_and_ignored_entries_are_skipped() {
    let temp = create_scenario_tree();
    let root = temp.path();
    fs::create_dir(root.join(".cache")).unwrap();
    fs::write(root.join(".cache/blob.bin"), "x").unwrap();
    fs::write(root.join("debug.log"), "x").unwrap();

    let config = WalkConfig::builder()
        .root(root)
        .include_hidden(false)
        .ignore_patterns(vec!["*.log".to_string(), "deep".to_string()])
        .build()
        .unwrap();
    let report = Walker::new(config).walk().unwrap();

    assert!(report.groups.get(&GroupKey::extension("bin")).is_none());
    assert!(report.groups.get(&GroupKey::extension("log")).is_none());
    assert!(report.groups.get(&GroupKey::NoExtension).is_none());
    assert_eq!(report.total_files(), 2);
    assert_eq!(report.stats.skipped, 3);
}

#[test]
fn test_max_depth_limits_descent() {
    let temp = create_scenario_tree();
    let root = temp.path();

    let config = WalkConfig::builder()
        .root(root)
        .max_depth(1u32)
        .build()
        .unwrap();
    let report = Walker::new(config).walk().unwrap();

    assert_eq!(
        report.groups.get(&GroupKey::extension("txt")).unwrap(),
        &[root.join("a.txt")]
    );
    assert_eq!(report.total_files(), 1);
}

#[test]
fn test_invalid_ignore_pattern_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = WalkConfig::builder()
        .root(temp.path())
        .ignore_patterns(vec!["[".to_string()])
        .build()
        .unwrap();

    assert!(matches!(
        Walker::new(config).walk(),
        Err(extwalk_scan::ScanError::InvalidConfig { .. })
    ));
}

#[cfg(unix)]
#[test]
fn test_symlinks_follow_config() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir(root.join("real")).unwrap();
    fs::write(root.join("real/data.csv"), "x").unwrap();
    std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

    let report = walk(root, 4);
    assert_eq!(report.total_files(), 1);
    assert_eq!(report.stats.skipped, 1);

    let config = WalkConfig::builder()
        .root(root)
        .follow_symlinks(true)
        .build()
        .unwrap();
    let report = Walker::new(config).walk().unwrap();

    let mut csv = report.groups.get(&GroupKey::extension("csv")).unwrap().to_vec();
    csv.sort();
    assert_eq!(
        csv,
        vec![root.join("link/data.csv"), root.join("real/data.csv")]
    );
}

#[test]
fn test_tasks_can_be_enqueued_from_other_threads() {
    let temp = create_scenario_tree();
    let queue = WorkQueue::new(4).unwrap();
    let handle = queue.handle();

    let root = temp.path().to_path_buf();
    std::thread::spawn(move || {
        handle.enqueue(Task::root(root.join("sub")));
        handle.enqueue(Task::root(root.join("a.txt")));
    })
    .join()
    .unwrap();

    let report = queue.join();
    assert_eq!(report.groups.total_files(), 3);
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_does_not_stop_siblings() {
    use std::os::unix::fs::PermissionsExt;

    let temp = create_scenario_tree();
    let root = temp.path();
    let locked = root.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("secret.key"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits are not enforced for privileged users
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = walk(root, 4);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let denied: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::PermissionDenied)
        .collect();
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].path, locked);

    assert_eq!(report.total_files(), 3);
    assert!(report.groups.get(&GroupKey::extension("key")).is_none());
    assert_eq!(report.stats.tasks_failed, 1);
    assert_eq!(report.stats.tasks_enqueued, report.stats.tasks_completed);
}
