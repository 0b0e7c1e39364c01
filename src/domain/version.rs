use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic version with standard precedence ordering.
///
/// Thin wrapper around [`semver::Version`] so parsing accepts the `v1.2.3`
/// form found in tags and manifests and increments follow the usual release
/// rules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(semver::Version);

impl Version {
    /// Create a release version without pre-release or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version(semver::Version::new(major, minor, patch))
    }

    /// The version used when a repository has no tags yet
    pub fn zero() -> Self {
        Version::new(0, 0, 0)
    }

    /// Parse a version, tolerating surrounding whitespace and a single leading `v`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let clean = trimmed.strip_prefix('v').unwrap_or(trimmed);

        semver::Version::parse(clean)
            .map(Version)
            .map_err(|e| SyncError::version(format!("Invalid version '{}': {}", input, e)))
    }

    /// Parse a tag name into a version, `None` if the tag is not a version
    pub fn from_tag(tag: &str) -> Option<Self> {
        Version::parse(tag).ok()
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }

    /// True when both versions share major.minor
    pub fn same_line(&self, other: &Version) -> bool {
        self.major() == other.major() && self.minor() == other.minor()
    }

    /// Increment according to the release kind.
    ///
    /// Pre-release and build metadata are always cleared. A pre-release is
    /// promoted to its own release number when that already satisfies the
    /// requested kind (`1.3.0-rc.1` + minor -> `1.3.0`), so the result is
    /// always strictly greater than `self`.
    pub fn bump(&self, kind: ReleaseKind) -> Self {
        let v = &self.0;
        let pre = self.is_prerelease();
        match kind {
            ReleaseKind::Major if pre && v.minor == 0 && v.patch == 0 => {
                Version::new(v.major, 0, 0)
            }
            ReleaseKind::Major => Version::new(v.major + 1, 0, 0),
            ReleaseKind::Minor if pre && v.patch == 0 => Version::new(v.major, v.minor, 0),
            ReleaseKind::Minor => Version::new(v.major, v.minor + 1, 0),
            ReleaseKind::Patch if pre => Version::new(v.major, v.minor, v.patch),
            ReleaseKind::Patch => Version::new(v.major, v.minor, v.patch + 1),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Version {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl From<semver::Version> for Version {
    fn from(v: semver::Version) -> Self {
        Version(v)
    }
}

/// Requested severity of the version increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    #[default]
    Patch,
    Minor,
    Major,
}

impl ReleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseKind::Patch => "patch",
            ReleaseKind::Minor => "minor",
            ReleaseKind::Major => "major",
        }
    }
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseKind {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Ok(ReleaseKind::Patch),
            "minor" => Ok(ReleaseKind::Minor),
            "major" => Ok(ReleaseKind::Major),
            other => Err(SyncError::config(format!(
                "Unknown release type '{}' - expected patch, minor or major",
                other
            ))),
        }
    }
}
