use crate::domain::version::{ReleaseKind, Version};
use std::collections::BTreeSet;

/// Naming convention for release tags in a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagPrefix {
    /// Tags are bare versions (`1.2.3`)
    #[default]
    Bare,
    /// Tags carry a literal `v` (`v1.2.3`)
    V,
}

impl TagPrefix {
    /// Detect the convention from the repository's current tag.
    ///
    /// Only a lowercase `v` counts; `V1.2.3` does not parse as a version at
    /// all. A repository without tags gets no prefix.
    pub fn detect(current_tag: Option<&str>) -> Self {
        match current_tag {
            Some(tag) if tag.starts_with('v') => TagPrefix::V,
            _ => TagPrefix::Bare,
        }
    }

    /// Format a version as a tag name under this convention
    pub fn format(&self, version: &Version) -> String {
        match self {
            TagPrefix::Bare => version.to_string(),
            TagPrefix::V => format!("v{}", version),
        }
    }
}

/// All tags of a repository, as names and as parsed versions.
///
/// Tags that are not semantic versions are kept by name but never take part
/// in ceiling lookups.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    names: BTreeSet<String>,
    versions: BTreeSet<Version>,
    prefix: TagPrefix,
}

impl TagSet {
    /// Build a tag set, detecting the prefix convention from `current_tag`
    pub fn new<I, S>(names: I, current_tag: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let versions = names.iter().filter_map(|n| Version::from_tag(n)).collect();

        TagSet {
            names,
            versions,
            prefix: TagPrefix::detect(current_tag),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Distinct versions present in the tag history, ascending
    pub fn versions(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter()
    }

    /// Format a version with this repository's prefix convention
    pub fn format(&self, version: &Version) -> String {
        self.prefix.format(version)
    }

    /// Highest tagged version on the same major.minor line as `anchor`.
    ///
    /// A major release searches the whole tag history instead.
    pub fn ceiling(&self, anchor: &Version, kind: ReleaseKind) -> Option<&Version> {
        match kind {
            ReleaseKind::Major => self.versions.iter().next_back(),
            _ => self
                .versions
                .iter()
                .rev()
                .find(|v| v.same_line(anchor)),
        }
    }
}

/// Substitute `{version}` and `{tag}` in a message template
pub fn render_template(template: &str, version: &Version, tag: &str) -> String {
    template
        .replace("{version}", &version.to_string())
        .replace("{tag}", tag)
}
