//! Provision command implementation
//!
//! Reads the manifest, provisions every user and repository it lists, and
//! prints a short summary:
//! 1. Create `users/` and `repos/` under the store root
//! 2. Generate missing user keys
//! 3. Materialize each repository once in staging
//! 4. Install per-user copies and their `gin/` sidecars

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use gin_mkdata::defaults;
use gin_mkdata::layout::Layout;
use gin_mkdata::provision::{ProvisionReport, Provisioner};
use gin_mkdata::store::RepoStore;

/// Arguments for provisioning
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Path to the manifest describing users and repositories
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Store root that receives `users/` and `repos/` (defaults to current directory)
    #[arg(long, value_name = "DIR", env = "GIN_MKDATA_ROOT")]
    pub root: Option<PathBuf>,

    /// Keep staged repositories in this directory instead of a temporary one
    #[arg(long, value_name = "DIR", env = "GIN_MKDATA_STAGING")]
    pub staging_dir: Option<PathBuf>,

    /// List the resulting store contents after provisioning
    #[arg(long)]
    pub list: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the provisioning run
pub fn execute(args: ProvisionArgs) -> Result<()> {
    let invocation_dir = std::env::current_dir().context("Failed to get current directory")?;

    if !args.manifest.exists() {
        anyhow::bail!("Manifest file not found: {}", args.manifest.display());
    }

    let layout = Layout::new(args.root.unwrap_or_else(|| invocation_dir.clone()));

    // Dropping the temporary directory removes the staged copies.
    let temp_staging;
    let staging_root = match args.staging_dir {
        Some(dir) => dir,
        None => {
            temp_staging =
                defaults::default_staging_dir().context("Failed to create staging directory")?;
            temp_staging.path().to_path_buf()
        }
    };

    let provisioner = Provisioner::new(layout, staging_root, invocation_dir);
    let report = provisioner
        .run(&args.manifest)
        .with_context(|| format!("Provisioning from {} failed", args.manifest.display()))?;

    if !args.quiet {
        print_summary(&report, provisioner.layout());
    }
    if args.list {
        print_inventory(provisioner.layout())?;
    }

    Ok(())
}

fn print_summary(report: &ProvisionReport, layout: &Layout) {
    println!("✅ Provisioned {}", layout.root().display());
    println!(
        "   {} users, {} new keys",
        report.users, report.keys_generated
    );
    println!(
        "   {} repositories installed, {} already present, {} materialized",
        report.repos_installed, report.repos_skipped, report.repos_materialized
    );
    if report.clone_failures > 0 {
        println!("⚠️  {} clones failed (see log)", report.clone_failures);
    }
}

fn print_inventory(layout: &Layout) -> Result<()> {
    let store = RepoStore::new(layout);
    for id in store.list_repos()? {
        let access = store.access(&id)?;
        let visibility = if access.public { "public" } else { "private" };
        let sharing: Vec<String> = access
            .sharing
            .iter()
            .map(|(peer, level)| format!("{}={}", peer, level.trim()))
            .collect();
        if sharing.is_empty() {
            println!("{} ({})", id, visibility);
        } else {
            println!("{} ({}) shared: {}", id, visibility, sharing.join(", "));
        }
    }
    Ok(())
}
