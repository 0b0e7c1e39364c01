//! Pure formatting functions for UI output.
//!
//! Everything here only prints; no state and no input handling.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::SyncOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a non-fatal warning.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠").yellow().bold(), warning);
}

/// Print the summary of a workflow run.
///
/// Shows warnings first, then either the unchanged tag (no-op), the planned
/// tag (dry run), or what was written, committed, tagged and pushed.
pub fn display_outcome(outcome: &SyncOutcome, dry_run: bool) {
    for warning in &outcome.warnings {
        display_boundary_warning(warning);
    }

    if outcome.no_op {
        display_success(&format!(
            "All versions are equal to {}. No update needed.",
            outcome.version
        ));
        if outcome.pushed {
            display_success(&format!("Pushed {} to remote", outcome.tag));
        }
        return;
    }

    println!("\n{}", style("Version Change:").bold());
    match &outcome.previous_tag {
        Some(previous) => println!("  From: {}", style(previous).red()),
        None => println!("  From: {}", style("(no tags)").dim()),
    }
    println!("  To:   {}", style(&outcome.tag).green());

    if dry_run {
        display_status("Dry run: no files written, nothing committed, tagged or pushed");
        return;
    }

    for path in &outcome.updated_files {
        display_success(&format!("Updated {} to {}", path.display(), outcome.version));
    }
    if let Some(commit) = &outcome.commit {
        let short = commit.get(..7).unwrap_or(commit);
        display_success(&format!("Committed {}", short));
    }
    if outcome.tagged {
        display_success(&format!("Created annotated tag {}", outcome.tag));
    }
    if outcome.pushed {
        display_success(&format!("Pushed {} to remote", outcome.tag));
    } else if outcome.tagged {
        display_status(&format!("Tag {} was created locally and not pushed", outcome.tag));
    }
}
