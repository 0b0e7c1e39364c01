//! Reading and writing the `version` field of tracked JSON manifests.
//!
//! Reads never fail the run: a file that cannot provide a version is reported
//! as a [`ManifestIssue`] and left out. Writes re-read the file, replace only
//! the `version` value and keep key order, indentation and trailing newline.

use crate::domain::{FileVersionRecord, FormattingHint, Version};
use crate::error::{Result, SyncError};
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

const VERSION_KEY: &str = "version";

static INDENT_RE: OnceLock<Regex> = OnceLock::new();

/// Why a tracked file did not contribute a version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestIssue {
    #[error("cannot read file: {0}")]
    Unreadable(String),

    #[error("file is empty")]
    Empty,

    #[error("not valid JSON: {0}")]
    NotJson(String),

    #[error("no \"version\" key")]
    MissingVersion,

    #[error("invalid semantic version: {0}")]
    InvalidVersion(String),
}

/// Versions collected from all tracked files
#[derive(Debug, Clone, Default)]
pub struct DeclaredVersions {
    pub records: Vec<FileVersionRecord>,
    pub skipped: Vec<(PathBuf, ManifestIssue)>,
}

/// Read the declared version of a manifest, or explain why there is none
pub fn inspect_manifest(path: &Path) -> std::result::Result<FileVersionRecord, ManifestIssue> {
    let content =
        fs::read_to_string(path).map_err(|e| ManifestIssue::Unreadable(e.to_string()))?;
    if content.trim().is_empty() {
        return Err(ManifestIssue::Empty);
    }

    let json: Value =
        serde_json::from_str(&content).map_err(|e| ManifestIssue::NotJson(e.to_string()))?;

    let raw = match json.get(VERSION_KEY) {
        None | Some(Value::Null) => return Err(ManifestIssue::MissingVersion),
        Some(Value::String(s)) => s.as_str(),
        Some(other) => return Err(ManifestIssue::InvalidVersion(other.to_string())),
    };
    let version =
        Version::parse(raw).map_err(|_| ManifestIssue::InvalidVersion(raw.to_string()))?;

    Ok(FileVersionRecord::new(path, version, detect_formatting(&content)))
}

/// Read every tracked file, keeping the order of `paths`
pub fn collect_declared<P: AsRef<Path>>(paths: &[P]) -> DeclaredVersions {
    let mut declared = DeclaredVersions::default();

    for path in paths {
        let path = path.as_ref();
        match inspect_manifest(path) {
            Ok(record) => {
                debug!(path = %path.display(), version = %record.version, "declared version");
                declared.records.push(record);
            }
            Err(issue) => {
                debug!(path = %path.display(), %issue, "skipping manifest");
                declared.skipped.push((path.to_path_buf(), issue));
            }
        }
    }

    declared
}

/// True when at least one file was read and every file declares `current`
pub fn all_versions_equal(current: &Version, records: &[FileVersionRecord]) -> bool {
    !records.is_empty() && records.iter().all(|r| &r.version == current)
}

/// Write `target` into the manifest described by `record`.
///
/// # Returns
/// * `Ok(true)` - The file was rewritten
/// * `Ok(false)` - The file already declares `target`; nothing was written
/// * `Err` - The file could not be re-read, parsed or written
pub fn apply_version(target: &Version, record: &FileVersionRecord) -> Result<bool> {
    let path = record.path.as_path();
    let content = fs::read_to_string(path)?;
    let mut json: Value = serde_json::from_str(&content)
        .map_err(|e| SyncError::manifest(path, format!("not valid JSON: {}", e)))?;

    let on_disk = json
        .get(VERSION_KEY)
        .and_then(Value::as_str)
        .and_then(|raw| Version::parse(raw).ok());
    if on_disk.as_ref() == Some(target) {
        debug!(path = %path.display(), version = %target, "already up to date");
        return Ok(false);
    }

    let object = json
        .as_object_mut()
        .ok_or_else(|| SyncError::manifest(path, "top-level value is not an object"))?;
    object.insert(VERSION_KEY.to_string(), Value::String(target.to_string()));

    fs::write(path, serialize(&json, &record.hint)?)?;
    info!(path = %path.display(), version = %target, "updated manifest");
    Ok(true)
}

fn serialize(json: &Value, hint: &FormattingHint) -> Result<Vec<u8>> {
    let mut out = if hint.indent.is_empty() {
        serde_json::to_vec(json)?
    } else {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(hint.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        json.serialize(&mut serializer)?;
        buf
    };

    if hint.trailing_newline {
        out.push(b'\n');
    }
    Ok(out)
}

/// Capture the indentation unit and trailing newline of a JSON document.
///
/// Tab-indented files use one tab per level; space-indented files use the
/// narrowest indentation found. Files without indented lines are compact.
pub fn detect_formatting(content: &str) -> FormattingHint {
    FormattingHint {
        indent: detect_indent(content),
        trailing_newline: content.ends_with('\n'),
    }
}

fn detect_indent(content: &str) -> String {
    let re = INDENT_RE
        .get_or_init(|| Regex::new(r"(?m)^([ \t]+)\S").expect("indent pattern is valid"));

    let mut indents = re
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());

    let Some(first) = indents.next() else {
        return String::new();
    };

    if first.starts_with('\t') {
        return "\t".to_string();
    }

    let narrowest = std::iter::once(first)
        .chain(indents)
        .filter(|i| !i.starts_with('\t'))
        .map(|i| i.chars().take_while(|c| *c == ' ').count())
        .filter(|w| *w > 0)
        .min()
        .unwrap_or(0);
    " ".repeat(narrowest)
}
