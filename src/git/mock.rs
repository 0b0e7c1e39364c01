use crate::error::{Result, SyncError};
use crate::git::Repository;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

/// A git operation recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOperation {
    Stage(Vec<PathBuf>),
    Commit(String),
    Tag { name: String, message: String },
    PushTag { remote: String, tag: String },
    PushBranch { remote: String, branch: String },
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    tags: RefCell<Vec<String>>,
    remote_tags: RefCell<Vec<String>>,
    latest_tag: Option<String>,
    branch: String,
    dirty: bool,
    staged: Cell<bool>,
    fail_push: bool,
    operations: RefCell<Vec<GitOperation>>,
}

impl MockRepository {
    /// Create a new empty mock repository on `main`
    pub fn new() -> Self {
        MockRepository {
            tags: RefCell::new(Vec::new()),
            remote_tags: RefCell::new(Vec::new()),
            latest_tag: None,
            branch: "main".to_string(),
            dirty: false,
            staged: Cell::new(false),
            fail_push: false,
            operations: RefCell::new(Vec::new()),
        }
    }

    /// Add a published tag; the most recently added tag becomes the latest one
    pub fn add_tag(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.remote_tags.get_mut().push(name.clone());
        self.add_local_tag(name);
    }

    /// Add a tag that exists locally but was never pushed
    pub fn add_local_tag(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.latest_tag = Some(name.clone());
        self.tags.get_mut().push(name);
    }

    /// Add a tag that is not reachable from HEAD
    pub fn add_unreachable_tag(&mut self, name: impl Into<String>) {
        self.tags.get_mut().push(name.into());
    }

    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    /// Whether staging the tracked files produces something to commit
    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Make every push fail with a remote error
    pub fn fail_push(&mut self) {
        self.fail_push = true;
    }

    /// Tags the remote knows about
    pub fn remote_tags(&self) -> Vec<String> {
        self.remote_tags.borrow().clone()
    }

    /// Operations performed so far, in order
    pub fn operations(&self) -> Vec<GitOperation> {
        self.operations.borrow().clone()
    }

    fn record(&self, op: GitOperation) {
        self.operations.borrow_mut().push(op);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.borrow().clone())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        Ok(self.latest_tag.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        Ok(self.staged.get())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        if self.dirty && !paths.is_empty() {
            self.staged.set(true);
        }
        self.record(GitOperation::Stage(paths.to_vec()));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        self.staged.set(false);
        self.record(GitOperation::Commit(message.to_string()));
        Ok(format!("{:040x}", self.operations.borrow().len()))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.tags.borrow().iter().any(|t| t == name) {
            return Err(SyncError::tag(format!("Tag '{}' already exists", name)));
        }
        self.tags.borrow_mut().push(name.to_string());
        self.record(GitOperation::Tag {
            name: name.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn remote_has_tag(&self, _remote: &str, tag: &str) -> Result<bool> {
        Ok(self.remote_tags.borrow().iter().any(|t| t == tag))
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        if self.fail_push {
            return Err(SyncError::remote(format!("Push of '{}' rejected", tag)));
        }
        let mut remote_tags = self.remote_tags.borrow_mut();
        if !remote_tags.iter().any(|t| t == tag) {
            remote_tags.push(tag.to_string());
        }
        self.record(GitOperation::PushTag {
            remote: remote.to_string(),
            tag: tag.to_string(),
        });
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        if self.fail_push {
            return Err(SyncError::remote(format!("Push of '{}' rejected", branch)));
        }
        self.record(GitOperation::PushBranch {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0");
        repo.add_unreachable_tag("v2.0.0");

        let tags = repo.list_tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&"v2.0.0".to_string()));
        assert_eq!(repo.latest_tag().unwrap(), Some("v1.0.0".to_string()));
    }

    #[test]
    fn test_mock_repository_records_operations() {
        let repo = MockRepository::new();
        repo.stage(&[PathBuf::from("package.json")]).unwrap();
        repo.commit("Update version to 1.0.1").unwrap();
        repo.create_annotated_tag("v1.0.1", "v1.0.1").unwrap();
        repo.push_tag("origin", "v1.0.1").unwrap();

        let ops = repo.operations();
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[1], GitOperation::Commit("Update version to 1.0.1".to_string()));
        assert!(repo.list_tags().unwrap().contains(&"v1.0.1".to_string()));
    }

    #[test]
    fn test_mock_repository_remote_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0");
        repo.add_local_tag("v1.0.1");

        assert_eq!(repo.latest_tag().unwrap(), Some("v1.0.1".to_string()));
        assert!(repo.remote_has_tag("origin", "v1.0.0").unwrap());
        assert!(!repo.remote_has_tag("origin", "v1.0.1").unwrap());

        repo.push_tag("origin", "v1.0.1").unwrap();
        assert!(repo.remote_has_tag("origin", "v1.0.1").unwrap());
    }

    #[test]
    fn test_mock_repository_staging() {
        let mut repo = MockRepository::new();
        repo.stage(&[PathBuf::from("package.json")]).unwrap();
        assert!(!repo.has_staged_changes().unwrap());

        repo.set_dirty(true);
        repo.stage(&[]).unwrap();
        assert!(!repo.has_staged_changes().unwrap());
        repo.stage(&[PathBuf::from("package.json")]).unwrap();
        assert!(repo.has_staged_changes().unwrap());
        repo.commit("release").unwrap();
        assert!(!repo.has_staged_changes().unwrap());
    }

    #[test]
    fn test_mock_repository_duplicate_tag() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0");
        assert!(repo.create_annotated_tag("v1.0.0", "again").is_err());
    }

    #[test]
    fn test_mock_repository_failing_push() {
        let mut repo = MockRepository::new();
        repo.fail_push();
        assert!(repo.push_tag("origin", "v1.0.0").is_err());
        assert!(repo.push_branch("origin", "main").is_err());
        assert!(repo.operations().is_empty());
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.list_tags().unwrap().is_empty());
        assert_eq!(repo.latest_tag().unwrap(), None);
        assert_eq!(repo.current_branch().unwrap(), "main");
        assert!(!repo.has_staged_changes().unwrap());
    }
}
