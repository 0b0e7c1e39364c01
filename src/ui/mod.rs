//! User interface module - terminal formatting and the CI result channel.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Writing step outputs for the calling CI job

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_outcome, display_status, display_success,
};

/// Key under which the resulting tag is published
pub const TAG_OUTPUT_KEY: &str = "tag-name";

/// Append a `key=value` line to a GitHub Actions style output file.
///
/// # Arguments
/// * `output_file` - Path taken from `GITHUB_OUTPUT`
/// * `key` - Output name
/// * `value` - Output value (must be a single line)
pub fn write_output(output_file: &Path, key: &str, value: &str) -> io::Result<()> {
    if value.contains('\n') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("output '{}' must be a single line", key),
        ));
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_file)?;
    writeln!(file, "{}={}", key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_output_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "other=1\n").unwrap();

        write_output(&path, TAG_OUTPUT_KEY, "v1.2.3").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "other=1\ntag-name=v1.2.3\n");
    }

    #[test]
    fn test_write_output_rejects_multiline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");
        assert!(write_output(&path, "x", "a\nb").is_err());
        assert!(!path.exists());
    }
}
