//! Git operations abstraction layer
//!
//! The release workflow only talks to git through the [Repository] trait:
//! listing tags, resolving the branch, and the porcelain needed to commit,
//! tag and push a release.
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation that records operations
//!
//! ```rust
//! # use version_sync::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> version_sync::Result<()> {
//! let tags = repo.list_tags()?;
//! let latest = repo.latest_tag()?;
//! println!("{} tags, latest {:?}", tags.len(), latest);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{GitOperation, MockRepository};
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::PathBuf;

/// Author and committer used for release commits and tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Default for Identity {
    fn default() -> Self {
        Identity {
            name: "github-actions".to_string(),
            email: "github-actions@github.com".to_string(),
        }
    }
}

/// Git capabilities consumed by the release workflow
///
/// All methods return [crate::error::Result<T>]; implementations map their
/// underlying failures (like `git2::Error`) onto [crate::error::SyncError].
pub trait Repository {
    /// All tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Most recent tag reachable from HEAD
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The nearest tagged commit's tag. When several tags
    ///   point at that commit, the highest version wins.
    /// * `Ok(None)` - No tag is reachable (or the repository has no commits)
    fn latest_tag(&self) -> Result<Option<String>>;

    /// Name of the checked out branch
    ///
    /// # Errors
    /// Fails when HEAD is detached, since there is no branch to push.
    fn current_branch(&self) -> Result<String>;

    /// True when the index differs from HEAD, so a commit would not be empty
    fn has_staged_changes(&self) -> Result<bool>;

    /// Add files to the index
    fn stage(&self, paths: &[PathBuf]) -> Result<()>;

    /// Commit the index on top of HEAD, returning the new commit hash
    fn commit(&self, message: &str) -> Result<String>;

    /// Create an annotated tag on HEAD
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// True when `remote` already advertises `refs/tags/<tag>`
    fn remote_has_tag(&self, remote: &str, tag: &str) -> Result<bool>;

    /// Force-push a tag to a remote
    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;

    /// Push a branch to a remote
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;
}
