//! Next-version resolution.
//!
//! The resolver is a pure function of the declared file versions, the current
//! tag, the full tag history and the requested release kind. It runs in two
//! phases:
//!
//! - [`Resolver::next_from_declared`] reconciles the declared versions against
//!   a baseline (adopting a file that is already ahead, or bumping).
//! - [`Resolver::next_avoiding_tags`] seeds that from the tag history and keeps
//!   stepping forward until the candidate is above every tag on its line.

use crate::domain::record::FileVersionRecord;
use crate::domain::tag::TagSet;
use crate::domain::version::{ReleaseKind, Version};
use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// When a tracked file already declares a version above the baseline, decides
/// which release kinds may adopt that version instead of bumping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StagedVersionPolicy {
    /// Only patch releases adopt the staged version; minor and major always bump
    #[default]
    PatchOnly,
    /// Every release kind adopts the staged version
    AnyKind,
}

impl fmt::Display for StagedVersionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagedVersionPolicy::PatchOnly => f.write_str("patch-only"),
            StagedVersionPolicy::AnyKind => f.write_str("any-kind"),
        }
    }
}

impl FromStr for StagedVersionPolicy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch-only" => Ok(StagedVersionPolicy::PatchOnly),
            "any-kind" => Ok(StagedVersionPolicy::AnyKind),
            other => Err(SyncError::config(format!(
                "Unknown staged version policy '{}' - expected patch-only or any-kind",
                other
            ))),
        }
    }
}

/// Computes the next release version
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    policy: StagedVersionPolicy,
}

impl Resolver {
    pub fn new(policy: StagedVersionPolicy) -> Self {
        Resolver { policy }
    }

    /// Resolve the next version for a run.
    ///
    /// Returns `current` unchanged when every declared version already equals
    /// it. Otherwise the result is at least every declared version and the
    /// current tag, and is not present in `tags`.
    ///
    /// # Errors
    /// * `SyncError::Resolution` - the collision search did not settle within
    ///   its iteration bound, which indicates a logic fault
    pub fn resolve(
        &self,
        declared: &[FileVersionRecord],
        current: &Version,
        tags: &TagSet,
        kind: ReleaseKind,
    ) -> Result<Version> {
        let versions: Vec<Version> = declared.iter().map(|r| r.version.clone()).collect();

        if !versions.is_empty() && versions.iter().all(|v| v == current) {
            debug!(%current, "declared versions already match the current tag");
            return Ok(current.clone());
        }

        self.next_avoiding_tags(&versions, current, tags, kind)
    }

    /// Reconcile declared versions against `baseline`.
    ///
    /// 1. Everything already at `baseline`: keep it.
    /// 2. A declared version is ahead of `baseline` and the policy allows it
    ///    for `kind`: adopt the highest declared version.
    /// 3. Otherwise bump `baseline` by `kind`.
    pub fn next_from_declared(
        &self,
        baseline: &Version,
        declared: &[Version],
        kind: ReleaseKind,
    ) -> Version {
        let max = declared.iter().max();
        let min = declared.iter().min();

        if max == Some(baseline) && min == Some(baseline) {
            return baseline.clone();
        }

        if let Some(max) = max {
            if max > baseline && self.adopts_staged(kind) {
                debug!(%baseline, staged = %max, "adopting staged file version");
                return max.clone();
            }
        }

        baseline.bump(kind)
    }

    /// Compute the next version so it never lands on an existing tag.
    ///
    /// The search is seeded from the highest tag on the line of the highest
    /// declared version (the whole history for major releases). Without such
    /// a tag the highest declared version is used as is. Each collision step
    /// bumps past the current ceiling, so the loop runs at most once per
    /// distinct tagged version.
    pub fn next_avoiding_tags(
        &self,
        declared: &[Version],
        current: &Version,
        tags: &TagSet,
        kind: ReleaseKind,
    ) -> Result<Version> {
        let max_declared = declared.iter().max();
        let anchor = max_declared.unwrap_or(current);

        let baseline = match tags.ceiling(anchor, kind) {
            Some(ceiling) => ceiling.max(current).clone(),
            None => match max_declared {
                Some(max) if max >= current => {
                    debug!(version = %max, "no tags on this line, using highest declared version");
                    return Ok(max.clone());
                }
                _ => current.clone(),
            },
        };

        let mut candidate = self.next_from_declared(&baseline, declared, kind);
        if let Some(max) = max_declared {
            if max > &candidate {
                candidate = max.clone();
            }
        }

        let limit = tags.versions().count() + 1;
        for _ in 0..limit {
            match tags.ceiling(&candidate, kind) {
                Some(ceiling) if candidate <= *ceiling => {
                    debug!(%candidate, %ceiling, "candidate collides with tag history");
                    candidate = ceiling.bump(kind);
                }
                _ => return Ok(candidate),
            }
        }

        Err(SyncError::resolution(format!(
            "no free version found after {} steps (last candidate {})",
            limit, candidate
        )))
    }

    fn adopts_staged(&self, kind: ReleaseKind) -> bool {
        match self.policy {
            StagedVersionPolicy::PatchOnly => kind == ReleaseKind::Patch,
            StagedVersionPolicy::AnyKind => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::FormattingHint;

    const KINDS: [ReleaseKind; 3] = [ReleaseKind::Patch, ReleaseKind::Minor, ReleaseKind::Major];

    fn v(raw: &str) -> Version {
        Version::parse(raw).unwrap()
    }

    fn records(versions: &[&str]) -> Vec<FileVersionRecord> {
        versions
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                FileVersionRecord::new(format!("file{}.json", i), v(raw), FormattingHint::default())
            })
            .collect()
    }

    fn resolve(declared: &[&str], current: &str, tags: &[&str], kind: ReleaseKind) -> Version {
        let current_tag = tags.iter().copied().find(|t| v(t) == v(current));
        let tag_set = TagSet::new(tags.iter().copied(), current_tag);
        Resolver::default()
            .resolve(&records(declared), &v(current), &tag_set, kind)
            .unwrap()
    }

    #[test]
    fn test_next_from_declared_keeps_matching_baseline() {
        let resolver = Resolver::default();
        let declared = vec![v("1.0.0"), v("1.0.0")];
        assert_eq!(
            resolver.next_from_declared(&v("1.0.0"), &declared, ReleaseKind::Minor),
            v("1.0.0")
        );
    }

    #[test]
    fn test_next_from_declared_bumps_baseline() {
        let resolver = Resolver::default();
        let declared = vec![v("1.0.1"), v("1.0.2")];
        assert_eq!(
            resolver.next_from_declared(&v("1.1.0"), &declared, ReleaseKind::Minor),
            v("1.2.0")
        );
    }

    #[test]
    fn test_next_from_declared_adopts_staged_for_patch() {
        let resolver = Resolver::default();
        let declared = vec![v("1.0.2"), v("1.0.3")];
        assert_eq!(
            resolver.next_from_declared(&v("1.0.1"), &declared, ReleaseKind::Patch),
            v("1.0.3")
        );
    }

    #[test]
    fn test_next_from_declared_explicit_kind_wins_over_staged() {
        let resolver = Resolver::default();
        let declared = vec![v("1.0.2"), v("1.0.3")];
        assert_eq!(
            resolver.next_from_declared(&v("1.0.1"), &declared, ReleaseKind::Minor),
            v("1.1.0")
        );
        assert_eq!(
            resolver.next_from_declared(&v("1.0.1"), &declared, ReleaseKind::Major),
            v("2.0.0")
        );
    }

    #[test]
    fn test_any_kind_policy_adopts_staged_for_minor() {
        let resolver = Resolver::new(StagedVersionPolicy::AnyKind);
        let declared = vec![v("1.0.2"), v("1.0.3")];
        assert_eq!(
            resolver.next_from_declared(&v("1.0.1"), &declared, ReleaseKind::Minor),
            v("1.0.3")
        );
    }

    #[test]
    fn test_next_from_declared_empty() {
        let resolver = Resolver::default();
        assert_eq!(
            resolver.next_from_declared(&v("1.0.0"), &[], ReleaseKind::Patch),
            v("1.0.1")
        );
    }

    #[test]
    fn test_no_op_for_every_kind() {
        for kind in KINDS {
            let resolved = resolve(&["1.2.1", "1.2.1"], "1.2.1", &["v1.2.0", "v1.2.1"], kind);
            assert_eq!(resolved, v("1.2.1"), "kind {}", kind);
        }
    }

    #[test]
    fn test_increment_without_declared_versions() {
        let expected = [
            ("1.0.1", ReleaseKind::Patch),
            ("1.1.0", ReleaseKind::Minor),
            ("2.0.0", ReleaseKind::Major),
        ];
        for (want, kind) in expected {
            assert_eq!(resolve(&[], "1.0.0", &["v1.0.0"], kind), v(want));
            assert_eq!(resolve(&[], "1.0.0", &[], kind), v(want));
        }
    }

    #[test]
    fn test_empty_repository_bumps_zero() {
        assert_eq!(resolve(&[], "0.0.0", &[], ReleaseKind::Patch), v("0.0.1"));
        assert_eq!(resolve(&[], "0.0.0", &[], ReleaseKind::Minor), v("0.1.0"));
        assert_eq!(resolve(&[], "0.0.0", &[], ReleaseKind::Major), v("1.0.0"));
    }

    #[test]
    fn test_standard_bump() {
        let declared = ["1.2.1", "1.2.2"];
        let tags = ["v1.0.0", "v1.2.0", "v1.2.1"];
        assert_eq!(resolve(&declared, "1.2.1", &tags, ReleaseKind::Patch), v("1.2.2"));
        assert_eq!(resolve(&declared, "1.2.1", &tags, ReleaseKind::Minor), v("1.3.0"));
        assert_eq!(resolve(&declared, "1.2.1", &tags, ReleaseKind::Major), v("2.0.0"));
    }

    #[test]
    fn test_tags_ahead_of_files() {
        let declared = ["1.2.0", "1.2.0"];
        let tags = ["v1.2.0", "v1.2.1", "v2.0.0", "v2.0.1"];
        assert_eq!(resolve(&declared, "1.2.1", &tags, ReleaseKind::Patch), v("1.2.2"));
        assert_eq!(resolve(&declared, "1.2.1", &tags, ReleaseKind::Major), v("3.0.0"));
    }

    #[test]
    fn test_untagged_repository_adopts_max_declared() {
        for kind in KINDS {
            assert_eq!(resolve(&["1.2.1", "1.2.2"], "0.0.0", &[], kind), v("1.2.2"));
        }
    }

    #[test]
    fn test_skips_run_of_conflicting_tags() {
        let tags = ["v1.1.0", "v1.2.0", "v1.2.1", "v1.2.2", "v1.2.3", "v1.3.0", "v1.4.0"];
        assert_eq!(resolve(&["1.2.0"], "1.1.0", &tags, ReleaseKind::Patch), v("1.2.4"));
        assert_eq!(resolve(&["1.2.0"], "1.1.0", &tags, ReleaseKind::Minor), v("1.5.0"));
    }

    #[test]
    fn test_staged_version_that_is_already_tagged() {
        let tags = ["v1.2.1", "v1.2.2"];
        assert_eq!(resolve(&["1.2.2", "1.2.2"], "1.2.1", &tags, ReleaseKind::Patch), v("1.2.3"));
    }

    #[test]
    fn test_major_keeps_declared_version_above_all_tags() {
        let tags = ["v1.2.1", "v2.0.1"];
        assert_eq!(resolve(&["5.0.0"], "1.2.1", &tags, ReleaseKind::Major), v("5.0.0"));
    }

    #[test]
    fn test_current_tag_ahead_of_files() {
        let tags = ["v1.0.0", "v3.0.0"];
        assert_eq!(resolve(&["1.0.0"], "3.0.0", &tags, ReleaseKind::Patch), v("3.0.1"));
    }

    #[test]
    fn test_prerelease_tag_is_released() {
        let tags = ["v1.2.1", "v1.2.2-rc.1"];
        assert_eq!(
            resolve(&["1.2.2-rc.1"], "1.2.1", &tags, ReleaseKind::Patch),
            v("1.2.2")
        );
    }

    #[test]
    fn test_resolved_version_is_monotonic_and_free() {
        let declared_sets: [&[&str]; 5] = [
            &[],
            &["1.2.0"],
            &["1.2.1", "1.2.2"],
            &["0.9.0", "1.4.0"],
            &["2.0.0", "2.0.0"],
        ];
        let tag_sets: [&[&str]; 4] = [
            &[],
            &["v1.2.1"],
            &["v1.2.0", "v1.2.1", "v1.2.2", "v2.0.1"],
            &["v1.4.0", "v1.5.0", "v3.0.0"],
        ];
        let currents = ["0.0.0", "1.2.1", "2.0.1"];

        for declared in declared_sets {
            for tags in tag_sets {
                for current in currents {
                    for kind in KINDS {
                        let tag_set = TagSet::new(tags.iter().copied(), Some("v0.0.0"));
                        let resolved = Resolver::default()
                            .resolve(&records(declared), &v(current), &tag_set, kind)
                            .unwrap();

                        let floor = declared
                            .iter()
                            .map(|d| v(d))
                            .chain(std::iter::once(v(current)))
                            .max()
                            .unwrap();
                        assert!(
                            resolved >= floor,
                            "{:?}/{:?}/{}/{}: {} < {}",
                            declared, tags, current, kind, resolved, floor
                        );

                        let is_no_op =
                            !declared.is_empty() && declared.iter().all(|d| v(d) == v(current));
                        if !is_no_op {
                            assert!(
                                !tags.contains(&tag_set.format(&resolved).as_str()),
                                "{:?}/{:?}/{}/{}: {} already tagged",
                                declared, tags, current, kind, resolved
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "patch-only".parse::<StagedVersionPolicy>().unwrap(),
            StagedVersionPolicy::PatchOnly
        );
        assert_eq!(
            "Any-Kind".parse::<StagedVersionPolicy>().unwrap(),
            StagedVersionPolicy::AnyKind
        );
        assert!("always".parse::<StagedVersionPolicy>().is_err());
    }
}
