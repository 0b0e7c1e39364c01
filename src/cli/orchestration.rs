//! Main workflow orchestration logic
//!
//! Ties the pieces together: read the tag history and the tracked manifests,
//! stop early when everything already agrees, otherwise resolve the next
//! version, write it back, then commit, tag and push.
//!
//! Every git or file failure aborts the remaining steps. Nothing is rolled
//! back; a rerun detects files that already carry the target version and
//! skips rewriting them, and pushes a tag that only exists locally.

use tracing::{info, warn};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{render_template, Resolver, TagSet, Version};
use crate::error::Result;
use crate::git::Repository;
use crate::manifest;

/// Result of a workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// Tag to report: the new tag, or the current one for a no-op run
    pub tag: String,

    pub version: Version,

    /// Latest tag before this run
    pub previous_tag: Option<String>,

    /// Everything already agreed; nothing was written, tagged or pushed
    pub no_op: bool,

    pub updated_files: Vec<std::path::PathBuf>,

    /// Hash of the release commit, if one was created
    pub commit: Option<String>,

    pub tagged: bool,

    pub pushed: bool,

    pub warnings: Vec<BoundaryWarning>,
}

/// Run the release workflow
///
/// # Arguments
///
/// * `repo` - Git capabilities (real or mock)
/// * `config` - Fully layered configuration
/// * `dry_run` - Resolve and report only; no file writes or git operations
///
/// # Returns
///
/// The outcome of the run, or the first collaborator failure
pub fn run_sync_workflow<R: Repository>(
    repo: &R,
    config: &Config,
    dry_run: bool,
) -> Result<SyncOutcome> {
    let mut warnings = Vec::new();

    let branch = match (&config.git.branch, config.git.push && !dry_run) {
        (Some(branch), _) => Some(branch.clone()),
        (None, true) => Some(repo.current_branch()?),
        (None, false) => None,
    };

    let tag_names = repo.list_tags()?;
    let previous_tag = repo.latest_tag()?;
    let current = match previous_tag.as_deref() {
        Some(tag) => Version::from_tag(tag).unwrap_or_else(|| {
            warnings.push(BoundaryWarning::UnparsableTag {
                tag: tag.to_string(),
            });
            Version::zero()
        }),
        None => Version::zero(),
    };
    let tags = TagSet::new(tag_names, previous_tag.as_deref());
    info!(current = %current, tags = tags.len(), "read tag history");

    let declared = manifest::collect_declared(&config.files);
    for (path, issue) in declared.skipped {
        warnings.push(BoundaryWarning::SkippedManifest { path, issue });
    }
    if declared.records.is_empty() {
        warnings.push(BoundaryWarning::NoTrackedVersions);
    }

    let mut outcome = SyncOutcome {
        tag: previous_tag
            .clone()
            .unwrap_or_else(|| tags.format(&current)),
        version: current.clone(),
        previous_tag,
        no_op: false,
        updated_files: Vec::new(),
        commit: None,
        tagged: false,
        pushed: false,
        warnings: Vec::new(),
    };

    if manifest::all_versions_equal(&current, &declared.records) {
        info!(version = %current, "all versions are equal, no update needed");
        outcome.no_op = true;

        // A previous run may have tagged locally and then failed to push
        if let (Some(tag), Some(branch)) = (&outcome.previous_tag, &branch) {
            if config.git.push && !dry_run && !repo.remote_has_tag(&config.git.remote, tag)? {
                warnings.push(BoundaryWarning::UnpublishedTag { tag: tag.clone() });
                repo.push_tag(&config.git.remote, tag)?;
                repo.push_branch(&config.git.remote, branch)?;
                outcome.pushed = true;
                info!(%tag, %branch, remote = %config.git.remote, "pushed unpublished tag");
            }
        }
        return Ok(finish(outcome, warnings));
    }

    let resolver = Resolver::new(config.release.staged_policy);
    let version = resolver.resolve(&declared.records, &current, &tags, config.release.kind)?;
    let tag = tags.format(&version);
    info!(%version, %tag, kind = %config.release.kind, "resolved next version");

    outcome.version = version.clone();
    outcome.tag = tag.clone();

    if dry_run {
        return Ok(finish(outcome, warnings));
    }

    for record in &declared.records {
        if manifest::apply_version(&version, record)? {
            outcome.updated_files.push(record.path.clone());
        }
    }

    let paths: Vec<_> = declared.records.iter().map(|r| r.path.clone()).collect();
    if !paths.is_empty() {
        repo.stage(&paths)?;
    }
    if !paths.is_empty() && repo.has_staged_changes()? {
        let message = render_template(&config.messages.commit, &version, &tag);
        outcome.commit = Some(repo.commit(&message)?);
    } else {
        warnings.push(BoundaryWarning::NothingToCommit { tag: tag.clone() });
    }

    let tag_message = if config.messages.tag.is_empty() {
        tag.clone()
    } else {
        render_template(&config.messages.tag, &version, &tag)
    };
    repo.create_annotated_tag(&tag, &tag_message)?;
    outcome.tagged = true;

    if let Some(branch) = branch.filter(|_| config.git.push) {
        repo.push_tag(&config.git.remote, &tag)?;
        repo.push_branch(&config.git.remote, &branch)?;
        outcome.pushed = true;
        info!(%tag, %branch, remote = %config.git.remote, "pushed release");
    }

    Ok(finish(outcome, warnings))
}

fn finish(mut outcome: SyncOutcome, warnings: Vec<BoundaryWarning>) -> SyncOutcome {
    for warning in &warnings {
        warn!("{}", warning);
    }
    outcome.warnings = warnings;
    outcome
}
