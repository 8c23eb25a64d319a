//! Directory walker: enumerates candidate files under a root.
//!
//! Subdirectories whose base name is on the ignore list are pruned together with
//! everything beneath them. A regular file is a candidate only when its extension
//! (case-sensitive, no leading dot) is on the allow list. Symbolic links are
//! followed; cycles and unreadable subdirectories become [`TraversalWarning`]s
//! and the walk carries on. A file reachable through several links is listed
//! once, under the first path that reaches it in sorted order.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

// ============================================================================
// Policy
// ============================================================================

/// Dependency, build output, cache and VCS directories. Pruned at any depth.
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    ".git",
    "build",
    "dist",
    ".svn",
    "bower_components",
    "tmp",
    "cache",
];

pub const BASE_EXTENSIONS: &[&str] = &["php", "txt", "js", "css", "json", "md"];

/// Base set plus single-file components.
pub const EXTENDED_EXTENSIONS: &[&str] = &["php", "txt", "js", "css", "json", "md", "vue"];

/// Fixed filtering policy for a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPolicy {
    pub ignored_directory_names: BTreeSet<String>,
    pub allowed_extensions: BTreeSet<String>,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED_DIRS, EXTENDED_EXTENSIONS)
    }
}

impl ScanPolicy {
    pub fn new(ignored: &[&str], extensions: &[&str]) -> Self {
        Self {
            ignored_directory_names: ignored.iter().map(|s| s.to_string()).collect(),
            allowed_extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Default ignore list with the narrower extension list (no `vue`).
    pub fn base() -> Self {
        Self::new(DEFAULT_IGNORED_DIRS, BASE_EXTENSIONS)
    }

    pub fn ignores_dir(&self, name: &str) -> bool {
        self.ignored_directory_names.contains(name)
    }

    /// Matches the text after the last dot of the file name, so dotfiles such
    /// as `.json` count as having the extension `json`.
    pub fn allows_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| self.allowed_extensions.contains(ext))
    }
}

// ============================================================================
// Types
// ============================================================================

/// A file that passed both filters. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    target: PathBuf,
    relative: String,
}

impl CandidateFile {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let target = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        Self::with_target(root, &path, target)
    }

    fn with_target(root: &Path, path: &Path, target: PathBuf) -> Self {
        Self {
            relative: relative_display(root, path),
            target,
        }
    }

    /// Resolved file behind the scanned path. Reads and writes go here so links survive.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path relative to the scan root, `/`-separated.
    pub fn relative(&self) -> &str {
        &self.relative
    }
}

impl Serialize for CandidateFile {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.relative)
    }
}

/// A subtree that could not be entered. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraversalWarning {
    pub path: String,
    pub message: String,
}

impl TraversalWarning {
    fn from_walk_error(err: &walkdir::Error, root: &Path) -> Option<Self> {
        let path = err
            .path()
            .map(|p| relative_display(root, p))
            .unwrap_or_default();

        if let Some(ancestor) = err.loop_ancestor() {
            return Some(Self {
                message: format!(
                    "Symlink loop: '{}' points back to '{}'",
                    path,
                    relative_display(root, ancestor)
                ),
                path,
            });
        }

        let io = err.io_error();
        // Dangling symlinks are entries without a target, not unreadable subtrees.
        if io.is_some_and(|e| e.kind() == ErrorKind::NotFound) {
            return None;
        }

        let reason = io
            .map(|e| e.to_string())
            .unwrap_or_else(|| err.to_string());
        Some(Self {
            message: format!("Could not enter '{}': {}", path, reason),
            path,
        })
    }
}

/// Materialized output of a scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    pub files: Vec<CandidateFile>,
    pub warnings: Vec<TraversalWarning>,
}

// ============================================================================
// Scanning
// ============================================================================

/// Scan `root` with the default policy.
pub fn scan(root: &Path) -> Result<ScanResult> {
    scan_with_policy(root, &ScanPolicy::default())
}

/// Scan `root`, returning every candidate file in lexicographic path order.
///
/// Fails only if `root` is missing, not a directory, or unreadable; those checks
/// run before any traversal.
pub fn scan_with_policy(root: &Path, policy: &ScanPolicy) -> Result<ScanResult> {
    ensure_scannable(root)?;
    log_status!("scan", "Scanning {}", root.display());

    let mut result = ScanResult::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, policy));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(warning) = TraversalWarning::from_walk_error(&err, root) {
                    log_status!("scan", "Warning: {}", warning.message);
                    result.warnings.push(warning);
                }
                continue;
            }
        };

        if !entry.file_type().is_file() || !policy.allows_file(entry.path()) {
            continue;
        }

        let path = entry.into_path();
        let target = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if !seen.insert(target.clone()) {
            log_status!("scan", "Already listed: {}", relative_display(root, &path));
            continue;
        }
        result.files.push(CandidateFile::with_target(root, &path, target));
    }

    log_status!(
        "scan",
        "Found {} candidate file(s), {} warning(s)",
        result.files.len(),
        result.warnings.len()
    );

    Ok(result)
}

fn ensure_scannable(root: &Path) -> Result<()> {
    let display = root.display().to_string();

    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::directory_not_found(display.clone()),
        _ => Error::directory_not_readable(display.clone(), e.to_string()),
    })?;

    if !metadata.is_dir() {
        return Err(
            Error::directory_not_found(display).with_hint("The path exists but is not a directory")
        );
    }

    fs::read_dir(root).map_err(|e| Error::directory_not_readable(display, e.to_string()))?;

    Ok(())
}

/// The root itself is never pruned, whatever its name.
fn is_pruned(entry: &DirEntry, policy: &ScanPolicy) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| policy.ignores_dir(name))
}

fn relative_display(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
