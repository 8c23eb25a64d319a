//! Replace engine: literal find and replace over a list of candidate files.
//!
//! Given a validated `ReplaceJob` and the walker's candidate list, the engine:
//! 1. Reads each file as raw bytes
//! 2. Replaces every non-overlapping occurrence of the search token, left to right
//! 3. Records `Unchanged` when the bytes come out identical
//! 4. Otherwise records `WouldModify` (dry run) or rewrites the file atomically
//!
//! Per-file problems never abort the batch; they become `Skipped` outcomes.

use crate::atomic;
use crate::error::{Error, Result};
use crate::walker::{self, CandidateFile, TraversalWarning};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

// ============================================================================
// Types
// ============================================================================

/// A search/replace token pair. Both tokens are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceJob {
    search: String,
    replace: String,
    dry_run: bool,
}

impl ReplaceJob {
    pub fn new(
        search: impl Into<String>,
        replace: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let search = search.into();
        let replace = replace.into();

        if search.is_empty() {
            return Err(Error::validation_invalid_argument(
                "search",
                "Search string must not be empty",
            ));
        }
        if replace.is_empty() {
            return Err(Error::validation_invalid_argument(
                "replace",
                "Replace string must not be empty",
            ));
        }

        Ok(Self {
            search,
            replace,
            dry_run,
        })
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn replace(&self) -> &str {
        &self.replace
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Why a candidate file was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Permission denied when opening for read.
    Unreadable,
    /// Any other read failure.
    ReadFailed,
    /// File is read-only.
    Unwritable,
    /// The rewrite itself failed.
    WriteFailed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Unreadable => "unreadable",
            SkipReason::ReadFailed => "read_failed",
            SkipReason::Unwritable => "unwritable",
            SkipReason::WriteFailed => "write_failed",
        }
    }
}

/// What happened to one candidate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Modified {
        path: String,
        replacements: usize,
    },
    WouldModify {
        path: String,
        replacements: usize,
    },
    Unchanged {
        path: String,
    },
    Skipped {
        path: String,
        reason: SkipReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &str {
        match self {
            FileOutcome::Modified { path, .. }
            | FileOutcome::WouldModify { path, .. }
            | FileOutcome::Unchanged { path }
            | FileOutcome::Skipped { path, .. } => path,
        }
    }

    fn skipped(file: &CandidateFile, reason: SkipReason, error: Option<String>) -> Self {
        FileOutcome::Skipped {
            path: file.relative().to_string(),
            reason,
            error,
        }
    }
}

/// Aggregate of one engine pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceReport {
    pub search: String,
    pub replace: String,
    pub dry_run: bool,
    pub outcomes: Vec<FileOutcome>,
    pub warnings: Vec<TraversalWarning>,
    modified: usize,
    would_modify: usize,
}

impl ReplaceReport {
    fn new(job: &ReplaceJob) -> Self {
        Self {
            search: job.search.clone(),
            replace: job.replace.clone(),
            dry_run: job.dry_run,
            outcomes: Vec::new(),
            warnings: Vec::new(),
            modified: 0,
            would_modify: 0,
        }
    }

    fn record(&mut self, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Modified { .. } => self.modified += 1,
            FileOutcome::WouldModify { .. } => self.would_modify += 1,
            FileOutcome::Skipped { path, reason, error } => {
                log_status!(
                    "replace",
                    "Skipped {} ({}){}",
                    path,
                    reason.as_str(),
                    error.as_deref().map(|e| format!(": {}", e)).unwrap_or_default()
                );
            }
            FileOutcome::Unchanged { .. } => {}
        }
        self.outcomes.push(outcome);
    }

    /// Number of candidate files the engine looked at.
    pub fn scanned(&self) -> usize {
        self.outcomes.len()
    }

    /// Files rewritten on disk (live mode).
    pub fn modified_count(&self) -> usize {
        self.modified
    }

    /// Files that would be rewritten (dry run).
    pub fn would_modify_count(&self) -> usize {
        self.would_modify
    }

    /// Count shown in the summary line for the current mode.
    pub fn changed_count(&self) -> usize {
        if self.dry_run {
            self.would_modify
        } else {
            self.modified
        }
    }

    pub fn unchanged_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Unchanged { .. }))
            .count()
    }

    /// Paths of files counted in `changed_count`, in processing order.
    pub fn changed_files(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| match o {
                FileOutcome::Modified { .. } => !self.dry_run,
                FileOutcome::WouldModify { .. } => self.dry_run,
                _ => false,
            })
            .map(FileOutcome::path)
            .collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    /// `N file(s) modified.` or `N file(s) would be modified.`
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "would be modified" } else { "modified" };
        format!("{} file(s) {}.", self.changed_count(), verb)
    }
}

// ============================================================================
// Literal replacement
// ============================================================================

/// Replace every non-overlapping occurrence of `needle`, scanning left to right.
/// Inserted text is never re-scanned. Returns the new bytes and the match count.
pub fn replace_literal(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> (Vec<u8>, usize) {
    if needle.is_empty() || needle.len() > haystack.len() {
        return (haystack.to_vec(), 0);
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut count = 0;
    let mut start = 0;

    while let Some(pos) = find_literal(&haystack[start..], needle) {
        let abs = start + pos;
        out.extend_from_slice(&haystack[start..abs]);
        out.extend_from_slice(replacement);
        start = abs + needle.len();
        count += 1;
    }

    out.extend_from_slice(&haystack[start..]);
    (out, count)
}

/// Jump between occurrences of the needle's first byte and compare only there.
fn find_literal(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let (&first, rest) = needle.split_first()?;
    let last_start = haystack.len().checked_sub(needle.len())?;

    let mut offset = 0;
    while offset <= last_start {
        let pos = offset + haystack[offset..=last_start].iter().position(|&b| b == first)?;
        if haystack[pos + 1..pos + needle.len()] == *rest {
            return Some(pos);
        }
        offset = pos + 1;
    }
    None
}

// ============================================================================
// Engine
// ============================================================================

/// Process `files` in order and build the report. Never fails.
pub fn apply(files: &[CandidateFile], job: &ReplaceJob) -> ReplaceReport {
    debug_assert!(!job.search.is_empty() && !job.replace.is_empty());

    let mut report = ReplaceReport::new(job);
    for file in files {
        let outcome = process_file(file, job);
        report.record(outcome);
    }

    log_status!("replace", "{}", report.summary());
    report
}

/// Scan `root` with the default policy, then apply `job` to every candidate.
///
/// Only precondition failures (missing or unreadable root) are returned as errors.
pub fn run(root: &Path, job: &ReplaceJob) -> Result<ReplaceReport> {
    let scan = walker::scan(root)?;
    let mut report = apply(&scan.files, job);
    report.warnings = scan.warnings;
    Ok(report)
}

fn process_file(file: &CandidateFile, job: &ReplaceJob) -> FileOutcome {
    let content = match fs::read(file.target()) {
        Ok(content) => content,
        Err(e) => {
            let reason = if e.kind() == ErrorKind::PermissionDenied {
                SkipReason::Unreadable
            } else {
                SkipReason::ReadFailed
            };
            return FileOutcome::skipped(file, reason, Some(e.to_string()));
        }
    };

    let (new_content, replacements) =
        replace_literal(&content, job.search.as_bytes(), job.replace.as_bytes());

    if new_content == content {
        return FileOutcome::Unchanged {
            path: file.relative().to_string(),
        };
    }

    if job.dry_run {
        return FileOutcome::WouldModify {
            path: file.relative().to_string(),
            replacements,
        };
    }

    match fs::metadata(file.target()) {
        Ok(meta) if meta.permissions().readonly() => {
            return FileOutcome::skipped(file, SkipReason::Unwritable, None);
        }
        Ok(_) => {}
        Err(e) => {
            return FileOutcome::skipped(file, SkipReason::Unwritable, Some(e.to_string()));
        }
    }

    if let Err(e) = atomic::write_atomic(file.target(), &new_content) {
        return FileOutcome::skipped(file, SkipReason::WriteFailed, Some(e.to_string()));
    }

    FileOutcome::Modified {
        path: file.relative().to_string(),
        replacements,
    }
}

// ============================================================================
// Tests
// ============================================================================
