use std::fmt;
use std::path::PathBuf;

use crate::manifest::ManifestIssue;

/// Non-fatal conditions met while preparing a release.
/// These are reported to the user but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A tracked file did not provide a version and was left out
    SkippedManifest { path: PathBuf, issue: ManifestIssue },
    /// No tracked file provided a version
    NoTrackedVersions,
    /// The latest tag cannot be parsed as a semantic version
    UnparsableTag { tag: String },
    /// Staging the tracked files left nothing to commit
    NothingToCommit { tag: String },
    /// The current tag exists locally but not on the remote
    UnpublishedTag { tag: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::SkippedManifest { path, issue } => {
                write!(f, "Skipping {}: {}", path.display(), issue)
            }
            BoundaryWarning::NoTrackedVersions => {
                write!(f, "No tracked file declares a version; only a tag will be created")
            }
            BoundaryWarning::UnparsableTag { tag } => {
                write!(f, "Cannot parse tag '{}' as a version, starting from 0.0.0", tag)
            }
            BoundaryWarning::NothingToCommit { tag } => {
                write!(f, "Nothing to commit, tagging the current commit as '{}'", tag)
            }
            BoundaryWarning::UnpublishedTag { tag } => {
                write!(f, "Tag '{}' is missing on the remote, pushing it again", tag)
            }
        }
    }
}
