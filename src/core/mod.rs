// Public modules
pub mod defaults;
pub mod error;
pub mod render;
pub mod replace;
pub mod walker;

// Internal modules - not part of public API
pub(crate) mod atomic;
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use replace::{FileOutcome, ReplaceJob, ReplaceReport, SkipReason};
pub use walker::{CandidateFile, ScanPolicy, ScanResult, TraversalWarning};
