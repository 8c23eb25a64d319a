use std::fs;
use std::path::Path;

use slugswap::replace::{self, FileOutcome, ReplaceJob, SkipReason};
use slugswap::walker;
use slugswap::ErrorCode;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// a.php and b.txt mention the slug; so does a vendored file that must be left alone.
fn plugin_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.php", "<?php define('OLDSLUG', 'oldslug');\n");
    write(dir.path(), "b.txt", "Plugin: oldslug\n");
    write(dir.path(), "node_modules/c.js", "require('oldslug');\n");
    dir
}

#[test]
fn live_replace_skips_pruned_directories() {
    let dir = plugin_tree();
    let job = ReplaceJob::new("oldslug", "newslug", false).unwrap();

    let report = replace::run(dir.path(), &job).unwrap();

    assert_eq!(report.summary(), "2 file(s) modified.");
    assert_eq!(report.changed_files(), vec!["a.php", "b.txt"]);
    assert_eq!(read(dir.path(), "a.php"), "<?php define('OLDSLUG', 'newslug');\n");
    assert_eq!(read(dir.path(), "b.txt"), "Plugin: newslug\n");
    assert_eq!(read(dir.path(), "node_modules/c.js"), "require('oldslug');\n");
}

#[test]
fn dry_run_enumerates_without_mutation() {
    let dir = plugin_tree();
    let before: Vec<String> = ["a.php", "b.txt", "node_modules/c.js"]
        .iter()
        .map(|f| read(dir.path(), f))
        .collect();
    let job = ReplaceJob::new("oldslug", "newslug", true).unwrap();

    let report = replace::run(dir.path(), &job).unwrap();

    assert_eq!(report.summary(), "2 file(s) would be modified.");
    assert_eq!(report.changed_files(), vec!["a.php", "b.txt"]);
    assert_eq!(report.modified_count(), 0);
    let after: Vec<String> = ["a.php", "b.txt", "node_modules/c.js"]
        .iter()
        .map(|f| read(dir.path(), f))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn empty_search_aborts_before_scanning() {
    let err = ReplaceJob::new("", "newslug", false).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
}

#[test]
fn missing_root_aborts_with_directory_error() {
    let dir = TempDir::new().unwrap();
    let job = ReplaceJob::new("oldslug", "newslug", false).unwrap();

    let err = replace::run(&dir.path().join("does-not-exist"), &job).unwrap_err();

    assert_eq!(err.code, ErrorCode::DirectoryNotFound);
}

#[test]
fn unwritable_file_is_itemized_and_others_still_processed() {
    let dir = plugin_tree();
    let locked = dir.path().join("a.php");
    let mut perms = fs::metadata(&locked).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&locked, perms).unwrap();

    let job = ReplaceJob::new("oldslug", "newslug", false).unwrap();
    let report = replace::run(dir.path(), &job).unwrap();

    assert_eq!(report.modified_count(), 1);
    assert_eq!(report.summary(), "1 file(s) modified.");
    let skipped: Vec<&FileOutcome> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert!(matches!(
        skipped[0],
        FileOutcome::Skipped { path, reason: SkipReason::Unwritable, .. } if path == "a.php"
    ));
    assert_eq!(read(dir.path(), "b.txt"), "Plugin: newslug\n");
    assert_eq!(read(dir.path(), "a.php"), "<?php define('OLDSLUG', 'oldslug');\n");
}

#[test]
fn second_live_pass_modifies_nothing() {
    let dir = plugin_tree();
    let job = ReplaceJob::new("oldslug", "newslug", false).unwrap();

    replace::run(dir.path(), &job).unwrap();
    let again = replace::run(dir.path(), &job).unwrap();

    assert_eq!(again.modified_count(), 0);
    assert_eq!(again.unchanged_count(), 2);
}

#[test]
fn forward_then_back_restores_content() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/plugin.php", "foo_init(); // foo\n");
    write(dir.path(), "readme.md", "# foo\n");
    let original = (read(dir.path(), "src/plugin.php"), read(dir.path(), "readme.md"));

    let forward = ReplaceJob::new("foo", "bar", false).unwrap();
    let back = ReplaceJob::new("bar", "foo", false).unwrap();
    replace::run(dir.path(), &forward).unwrap();
    replace::run(dir.path(), &back).unwrap();

    assert_eq!(
        (read(dir.path(), "src/plugin.php"), read(dir.path(), "readme.md")),
        original
    );
}

#[test]
fn pruned_files_never_become_candidates() {
    let dir = TempDir::new().unwrap();
    for ignored in walker::DEFAULT_IGNORED_DIRS {
        write(dir.path(), &format!("{}/x.php", ignored), "x");
        write(dir.path(), &format!("src/{}/nested/y.js", ignored), "y");
    }
    write(dir.path(), "src/keep.php", "k");

    let scan = walker::scan(dir.path()).unwrap();

    let files: Vec<&str> = scan.files.iter().map(|f| f.relative()).collect();
    assert_eq!(files, vec!["src/keep.php"]);
}

#[test]
fn replacement_containing_search_does_not_expand() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.js", "slug slug");
    let job = ReplaceJob::new("slug", "slug-pro-slug", false).unwrap();

    let report = replace::run(dir.path(), &job).unwrap();

    assert_eq!(report.modified_count(), 1);
    assert_eq!(read(dir.path(), "a.js"), "slug-pro-slug slug-pro-slug");
}
