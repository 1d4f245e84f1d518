//! Proactive analysis - heuristic issue detection over pod snapshots.
//!
//! Pure functions only; fetching pods and calling the engine happen in the
//! application layer.

mod issue;
mod prompt;

pub use issue::{detect_issues, Issue, IssueKind, RESTART_THRESHOLD};
pub use prompt::analysis_prompt;
