use clap::Args;
use serde::Serialize;

use slugswap::defaults::{self, Defaults, OutputFormat};
use slugswap::render;
use slugswap::replace::{self, FileOutcome, ReplaceJob, ReplaceReport};
use slugswap::walker::TraversalWarning;

use super::CmdResult;

#[derive(Args, Debug)]
pub struct ReplaceArgs {
    /// Literal text to search for
    pub search: Option<String>,

    /// Literal text to put in its place
    pub replace: Option<String>,

    /// Directory to process (defaults to the configured project root, then the current directory)
    #[arg(short, long)]
    pub directory: Option<String>,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Print a plain-text report instead of JSON
    #[arg(long)]
    pub text: bool,
}

impl ReplaceArgs {
    /// Whether this invocation renders text, from the flag or the config default.
    pub fn wants_text(&self, defaults: &Defaults) -> bool {
        self.text || defaults.output == OutputFormat::Text
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutput {
    pub command: String,
    pub search: String,
    pub replace: String,
    pub directory: String,
    pub dry_run: bool,
    pub summary: String,
    pub scanned: usize,
    pub modified: usize,
    pub would_modify: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub modified_files: Vec<String>,
    pub would_modify_files: Vec<String>,
    pub skipped_files: Vec<FileOutcome>,
    pub warnings: Vec<TraversalWarning>,
}

impl ReplaceOutput {
    fn from_report(report: &ReplaceReport, directory: String) -> Self {
        let mut modified_files = Vec::new();
        let mut would_modify_files = Vec::new();
        for outcome in &report.outcomes {
            match outcome {
                FileOutcome::Modified { path, .. } => modified_files.push(path.clone()),
                FileOutcome::WouldModify { path, .. } => would_modify_files.push(path.clone()),
                _ => {}
            }
        }

        let skipped_files: Vec<FileOutcome> = report.skipped().cloned().collect();

        ReplaceOutput {
            command: "replace".to_string(),
            search: report.search.clone(),
            replace: report.replace.clone(),
            directory,
            dry_run: report.dry_run,
            summary: report.summary(),
            scanned: report.scanned(),
            modified: report.modified_count(),
            would_modify: report.would_modify_count(),
            unchanged: report.unchanged_count(),
            skipped: skipped_files.len(),
            modified_files,
            would_modify_files,
            skipped_files,
            warnings: report.warnings.clone(),
        }
    }
}

pub fn run(args: ReplaceArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ReplaceOutput> {
    let (report, directory) = execute(&args)?;
    Ok((ReplaceOutput::from_report(&report, directory), 0))
}

pub fn run_text(args: ReplaceArgs) -> slugswap::Result<(String, i32)> {
    let (report, _) = execute(&args)?;
    Ok((render::render_text(&report), 0))
}

/// Validate tokens, resolve the root, then scan and replace.
///
/// Argument checks run first so an invalid call never touches the filesystem.
fn execute(args: &ReplaceArgs) -> slugswap::Result<(ReplaceReport, String)> {
    let job = build_job(args)?;
    let root = defaults::resolve_root(args.directory.as_deref(), &defaults::load_defaults())?;

    let report = replace::run(&root, &job)?;
    Ok((report, root.display().to_string()))
}

fn build_job(args: &ReplaceArgs) -> slugswap::Result<ReplaceJob> {
    let missing: Vec<String> = [("search", &args.search), ("replace", &args.replace)]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(slugswap::Error::validation_missing_argument(missing)
            .with_hint("Usage: slugswap replace <SEARCH> <REPLACE> [--directory DIR] [--dry-run]"));
    }

    ReplaceJob::new(
        args.search.clone().unwrap_or_default(),
        args.replace.clone().unwrap_or_default(),
        args.dry_run,
    )
}
