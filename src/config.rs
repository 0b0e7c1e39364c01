use crate::domain::{ReleaseKind, StagedVersionPolicy};
use crate::error::{Result, SyncError};
use crate::git::Identity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "versionsync.toml";

/// Represents the complete configuration for version-sync.
///
/// Built once at startup (defaults, then the TOML file, then CLI flags and
/// environment variables) and passed down to the workflow.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Tracked JSON manifests
    #[serde(default)]
    pub files: Vec<PathBuf>,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub messages: MessagesConfig,

    #[serde(default)]
    pub git: GitConfig,
}

/// How the next version is chosen.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default)]
    pub kind: ReleaseKind,

    #[serde(default)]
    pub staged_policy: StagedVersionPolicy,
}

fn default_commit_message() -> String {
    "Update version to {version}".to_string()
}

/// Commit and tag message templates.
///
/// Both accept `{version}` and `{tag}` placeholders. An empty tag template
/// annotates the tag with its own name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MessagesConfig {
    #[serde(default = "default_commit_message")]
    pub commit: String,

    #[serde(default)]
    pub tag: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        MessagesConfig {
            commit: default_commit_message(),
            tag: String::new(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_user_name() -> String {
    Identity::default().name
}

fn default_user_email() -> String {
    Identity::default().email
}

fn default_push() -> bool {
    true
}

/// Git settings for the release commit, tag and push.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch to push; the checked out branch when unset
    #[serde(default)]
    pub branch: Option<String>,

    #[serde(default = "default_user_name")]
    pub user_name: String,

    #[serde(default = "default_user_email")]
    pub user_email: String,

    #[serde(default = "default_push")]
    pub push: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            branch: None,
            user_name: default_user_name(),
            user_email: default_user_email(),
            push: default_push(),
        }
    }
}

impl GitConfig {
    pub fn identity(&self) -> Identity {
        Identity {
            name: self.user_name.clone(),
            email: self.user_email.clone(),
        }
    }
}

/// Values given on the command line or through the environment.
///
/// `None` keeps whatever the configuration file (or default) says.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub release_kind: Option<ReleaseKind>,
    pub staged_policy: Option<StagedVersionPolicy>,
    pub files: Option<Vec<PathBuf>>,
    pub commit_message: Option<String>,
    pub tag_message: Option<String>,
    pub remote: Option<String>,
    pub branch: Option<String>,
    pub no_push: bool,
}

impl Config {
    /// Layer command line / environment values on top of this configuration
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(kind) = overrides.release_kind {
            self.release.kind = kind;
        }
        if let Some(policy) = overrides.staged_policy {
            self.release.staged_policy = policy;
        }
        if let Some(files) = overrides.files {
            let files: Vec<PathBuf> = files
                .into_iter()
                .filter(|f| !f.as_os_str().is_empty())
                .collect();
            if !files.is_empty() {
                self.files = files;
            }
        }
        if let Some(commit) = overrides.commit_message.filter(|m| !m.is_empty()) {
            self.messages.commit = commit;
        }
        if let Some(tag) = overrides.tag_message {
            self.messages.tag = tag;
        }
        if let Some(remote) = overrides.remote.filter(|r| !r.is_empty()) {
            self.git.remote = remote;
        }
        if let Some(branch) = overrides.branch.filter(|b| !b.is_empty()) {
            self.git.branch = Some(branch);
        }
        if overrides.no_push {
            self.git.push = false;
        }
        self
    }
}

/// Parse configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| SyncError::config(e.to_string()))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `versionsync.toml` in current directory
/// 3. `.versionsync.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(path) = dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|p| p.exists())
    {
        path
    } else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        SyncError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&content)
        .map_err(|e| SyncError::config(format!("Invalid {}: {}", path.display(), e)))
}
