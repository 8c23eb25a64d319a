//! Plain-text rendering of a replace report.

use crate::replace::{FileOutcome, ReplaceReport};
use std::fmt::Write;

/// Render `report` as human-readable lines ending with the summary line.
pub fn render_text(report: &ReplaceReport) -> String {
    let mut out = String::new();

    if report.dry_run {
        let _ = writeln!(out, "Dry run: no files will be changed.");
    }

    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Modified { path, replacements } => {
                let _ = writeln!(out, "Modified: {} ({})", path, plural(*replacements));
            }
            FileOutcome::WouldModify { path, replacements } => {
                let _ = writeln!(out, "Would modify: {} ({})", path, plural(*replacements));
            }
            FileOutcome::Skipped {
                path,
                reason,
                error,
            } => match error {
                Some(error) => {
                    let _ = writeln!(out, "Skipped ({}): {} - {}", reason.as_str(), path, error);
                }
                None => {
                    let _ = writeln!(out, "Skipped ({}): {}", reason.as_str(), path);
                }
            },
            FileOutcome::Unchanged { .. } => {}
        }
    }

    for warning in &report.warnings {
        let _ = writeln!(out, "Warning: {}", warning.message);
    }

    let _ = writeln!(out, "{}", report.summary());
    out
}

fn plural(replacements: usize) -> String {
    if replacements == 1 {
        "1 replacement".to_string()
    } else {
        format!("{} replacements", replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replace::{apply, ReplaceJob};
    use crate::walker::CandidateFile;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dry_run_lists_files_and_summary() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.php"), "oldslug oldslug").unwrap();
        fs::write(dir.path().join("b.txt"), "plain").unwrap();
        let files = vec![
            CandidateFile::new(dir.path(), dir.path().join("a.php")),
            CandidateFile::new(dir.path(), dir.path().join("b.txt")),
        ];
        let job = ReplaceJob::new("oldslug", "newslug", true).unwrap();

        let text = render_text(&apply(&files, &job));

        assert_eq!(
            text,
            "Dry run: no files will be changed.\n\
             Would modify: a.php (2 replacements)\n\
             1 file(s) would be modified.\n"
        );
    }

    #[test]
    fn skipped_files_are_itemized() {
        let dir = TempDir::new().unwrap();
        let files = vec![CandidateFile::new(dir.path(), dir.path().join("gone.php"))];
        let job = ReplaceJob::new("oldslug", "newslug", false).unwrap();

        let text = render_text(&apply(&files, &job));

        assert!(text.starts_with("Skipped (read_failed): gone.php - "));
        assert!(text.ends_with("0 file(s) modified.\n"));
    }
}
