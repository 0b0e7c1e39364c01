use crate::domain::Version;
use crate::error::{Result, SyncError};
use crate::git::{Identity, Repository};
use git2::{
    Cred, CredentialType, Direction, ErrorClass, ErrorCode, ObjectType, Oid, PushOptions,
    Remote, RemoteCallbacks, Repository as Git2Repo, Signature, Sort,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    identity: Identity,
    token: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            identity: Identity::default(),
            token: None,
        }
    }

    /// Author/committer for release commits and tags
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    /// HTTPS token used for pushes (sent as `x-access-token`)
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn signature(&self) -> Result<Signature<'static>> {
        Ok(Signature::now(&self.identity.name, &self.identity.email)?)
    }

    fn workdir(&self) -> Result<PathBuf> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| SyncError::config("Bare repositories are not supported"))?;
        Ok(workdir.canonicalize()?)
    }

    fn find_remote(&self, remote_name: &str) -> Result<Remote<'_>> {
        self.repo
            .find_remote(remote_name)
            .map_err(|e| SyncError::remote(format!("Cannot find remote '{}': {}", remote_name, e)))
    }

    /// Credentials for talking to a remote: token, then SSH, then defaults
    fn remote_callbacks(&self) -> RemoteCallbacks<'static> {
        let token = self.token.clone();
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |_url, username_from_url, allowed_types| {
            if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
                if let Some(token) = &token {
                    return Cred::userpass_plaintext("x-access-token", token);
                }
            }

            if allowed_types.contains(CredentialType::SSH_KEY) {
                let username = username_from_url.unwrap_or("git");
                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }

                if let Some(home) = dirs::home_dir() {
                    for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                        let path = home.join(".ssh").join(key);
                        if path.exists() {
                            if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                                return Ok(cred);
                            }
                        }
                    }
                }
            }

            Cred::default()
        });
        callbacks
    }

    fn push(&self, remote_name: &str, refspec: &str) -> Result<()> {
        let mut remote = self.find_remote(remote_name)?;

        let mut callbacks = self.remote_callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Remote rejected {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        debug!(remote = remote_name, refspec, "pushing");
        remote
            .push(&[refspec], Some(&mut push_options))
            .map_err(|e| match e.class() {
                ErrorClass::Net => SyncError::remote(format!("Network error during push: {}", e)),
                ErrorClass::Reference => {
                    SyncError::remote(format!("Reference error during push: {}", e))
                }
                _ => SyncError::remote(format!("Push of '{}' failed: {}", refspec, e)),
            })
    }
}

impl Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn latest_tag(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let head_oid = head.peel_to_commit()?.id();

        // Annotated and lightweight tags both resolve to the tagged commit
        let mut tags_by_commit: HashMap<Oid, Vec<String>> = HashMap::new();
        for name in self.repo.tag_names(None)?.iter().flatten() {
            let Ok(reference) = self.repo.find_reference(&format!("refs/tags/{}", name)) else {
                continue;
            };
            if let Ok(commit) = reference.peel_to_commit() {
                tags_by_commit
                    .entry(commit.id())
                    .or_default()
                    .push(name.to_string());
            }
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head_oid)?;

        for oid in revwalk {
            if let Some(names) = tags_by_commit.get(&oid?) {
                return Ok(names
                    .iter()
                    .max_by(|a, b| Version::from_tag(a).cmp(&Version::from_tag(b)))
                    .cloned());
            }
        }

        Ok(None)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(SyncError::config(
                "HEAD is detached - configure the branch to push explicitly",
            ));
        }

        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| SyncError::config("Branch name is not valid UTF-8"))
    }

    fn has_staged_changes(&self) -> Result<bool> {
        let head_tree = match self.repo.head() {
            Ok(head) => Some(head.peel_to_tree()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };

        let diff = self.repo.diff_tree_to_index(head_tree.as_ref(), None, None)?;
        Ok(diff.deltas().next().is_some())
    }

    fn stage(&self, paths: &[PathBuf]) -> Result<()> {
        let workdir = self.workdir()?;
        let mut index = self.repo.index()?;

        for path in paths {
            let absolute = path.canonicalize()?;
            let relative = absolute.strip_prefix(&workdir).map_err(|_| {
                SyncError::config(format!("{} is outside the repository", path.display()))
            })?;
            index.add_path(relative)?;
        }

        index.write()?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let signature = self.signature()?;
        let mut index = self.repo.index()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        info!(commit = %oid, "created commit");
        Ok(oid.to_string())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let target = self.repo.head()?.peel(ObjectType::Commit)?;
        let signature = self.signature()?;

        self.repo
            .tag(name, &target, &signature, message, false)
            .map_err(|e| SyncError::tag(format!("Cannot create tag '{}': {}", name, e)))?;
        info!(tag = name, "created annotated tag");
        Ok(())
    }

    fn remote_has_tag(&self, remote: &str, tag: &str) -> Result<bool> {
        let mut remote_handle = self.find_remote(remote)?;
        let refname = format!("refs/tags/{}", tag);

        let connection = remote_handle
            .connect_auth(Direction::Fetch, Some(self.remote_callbacks()), None)
            .map_err(|e| SyncError::remote(format!("Cannot reach remote '{}': {}", remote, e)))?;
        let found = connection.list()?.iter().any(|head| head.name() == refname);

        debug!(remote, tag, found, "checked remote for tag");
        Ok(found)
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        self.push(remote, &format!("+refs/tags/{}:refs/tags/{}", tag, tag))
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        self.push(remote, &format!("refs/heads/{}:refs/heads/{}", branch, branch))
    }
}
