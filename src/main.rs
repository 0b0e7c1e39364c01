use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use version_sync::cli::run_sync_workflow;
use version_sync::config::{self, ConfigOverrides};
use version_sync::domain::{ReleaseKind, StagedVersionPolicy};
use version_sync::git::Git2Repository;
use version_sync::{logging, ui};

#[derive(clap::Parser)]
#[command(
    name = "version-sync",
    version,
    about = "Synchronize the version of JSON manifests with git tags, then commit, tag and push"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 't',
        long,
        env = "RELEASE_TYPE",
        help = "Release type: patch, minor or major [default: patch]"
    )]
    release_type: Option<ReleaseKind>,

    #[arg(
        short,
        long,
        env = "JSON_FILES",
        value_delimiter = ' ',
        num_args = 1..,
        help = "Tracked JSON files (space separated)"
    )]
    files: Option<Vec<PathBuf>>,

    #[arg(long, env = "COMMIT_MESSAGE", help = "Commit message template ({version}, {tag})")]
    commit_message: Option<String>,

    #[arg(long, env = "TAG_MESSAGE", help = "Tag message template ({version}, {tag})")]
    tag_message: Option<String>,

    #[arg(
        long,
        help = "Which release types adopt a version already staged in files: patch-only or any-kind"
    )]
    staged_policy: Option<StagedVersionPolicy>,

    #[arg(long, help = "Remote to push to [default: origin]")]
    remote: Option<String>,

    #[arg(short, long, help = "Branch to push [default: current branch]")]
    branch: Option<String>,

    #[arg(long, help = "Commit and tag locally without pushing")]
    no_push: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?.with_overrides(ConfigOverrides {
        release_kind: args.release_type,
        staged_policy: args.staged_policy,
        files: args.files,
        commit_message: args.commit_message,
        tag_message: args.tag_message,
        remote: args.remote,
        branch: args.branch,
        no_push: args.no_push,
    });

    let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    let repo = Git2Repository::open(".")
        .context("Not in a git repository")?
        .with_identity(config.git.identity())
        .with_token(token);

    ui::display_status(&format!(
        "Releasing {} for {} file(s)",
        config.release.kind,
        config.files.len()
    ));

    let outcome = run_sync_workflow(&repo, &config, args.dry_run)?;
    ui::display_outcome(&outcome, args.dry_run);

    if let Some(output_file) = std::env::var_os("GITHUB_OUTPUT") {
        let output_file = PathBuf::from(output_file);
        ui::write_output(&output_file, ui::TAG_OUTPUT_KEY, &outcome.tag)
            .with_context(|| format!("Cannot write {}", output_file.display()))?;
    }
    println!("{}", outcome.tag);

    Ok(())
}
