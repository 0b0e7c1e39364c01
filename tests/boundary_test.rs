use std::path::PathBuf;

use version_sync::boundary::BoundaryWarning;
use version_sync::manifest::ManifestIssue;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_skipped_manifest_display() {
    let warning = BoundaryWarning::SkippedManifest {
        path: PathBuf::from("packages/app/package.json"),
        issue: ManifestIssue::MissingVersion,
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("packages/app/package.json"),
        "Message should contain the path, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("no \"version\" key"),
        "Message should contain the reason, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_invalid_version_display() {
    let warning = BoundaryWarning::SkippedManifest {
        path: PathBuf::from("manifest.json"),
        issue: ManifestIssue::InvalidVersion("one.two".to_string()),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("one.two"),
        "Message should contain the rejected value, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_unparsable_tag_display() {
    let warning = BoundaryWarning::UnparsableTag {
        tag: "nightly".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Cannot parse tag"),
        "Message should contain 'Cannot parse tag', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("nightly"),
        "Message should contain tag 'nightly', got: {}",
        display_msg
    );
    assert!(display_msg.contains("0.0.0"));
}

#[test]
fn test_boundary_warning_nothing_to_commit_display() {
    let warning = BoundaryWarning::NothingToCommit {
        tag: "v1.2.3".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("v1.2.3"),
        "Message should contain tag 'v1.2.3', got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_unpublished_tag_display() {
    let warning = BoundaryWarning::UnpublishedTag {
        tag: "v1.0.1".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("v1.0.1"));
    assert!(
        display_msg.contains("missing on the remote"),
        "Message should explain the retry, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warnings_are_single_line() {
    let warnings = vec![
        BoundaryWarning::SkippedManifest {
            path: PathBuf::from("a.json"),
            issue: ManifestIssue::Empty,
        },
        BoundaryWarning::NoTrackedVersions,
        BoundaryWarning::UnparsableTag {
            tag: "x".to_string(),
        },
        BoundaryWarning::NothingToCommit {
            tag: "1.0.0".to_string(),
        },
        BoundaryWarning::UnpublishedTag {
            tag: "v1.0.1".to_string(),
        },
    ];

    for warning in warnings {
        let msg = warning.to_string();
        assert!(!msg.is_empty());
        assert!(!msg.contains('\n'), "multi-line warning: {}", msg);
    }
}
