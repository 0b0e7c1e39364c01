use crate::domain::version::Version;
use std::path::PathBuf;

/// Formatting captured from a manifest so a rewrite looks like the original
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattingHint {
    /// One level of indentation (`"  "`, `"\t"`, ...). Empty means compact JSON.
    pub indent: String,
    pub trailing_newline: bool,
}

/// The version declared by one tracked file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVersionRecord {
    pub path: PathBuf,
    pub version: Version,
    pub hint: FormattingHint,
}

impl FileVersionRecord {
    pub fn new(path: impl Into<PathBuf>, version: Version, hint: FormattingHint) -> Self {
        FileVersionRecord {
            path: path.into(),
            version,
            hint,
        }
    }
}
