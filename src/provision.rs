//! Provisioning run over a whole manifest.
//!
//! For every user, in manifest order: make sure the identity exists, then
//! install each of the user's repositories. Repositories are materialized
//! lazily, the first time an install actually needs them, so a second run
//! over an already provisioned store does no cloning or generating at all.
//!
//! Any error aborts the run. Nothing already written is rolled back.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::identity::{self, DefaultKeyOperations, KeyOperations};
use crate::install::{InstallOutcome, Installer};
use crate::layout::Layout;
use crate::manifest::{self, Manifest};
use crate::repository::{DefaultGitOperations, GitOperations, Materializer};

/// Counters describing what a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub users: usize,
    pub keys_generated: usize,
    pub repos_materialized: usize,
    pub repos_installed: usize,
    pub repos_skipped: usize,
    /// Source and install clones that failed and were tolerated
    pub clone_failures: usize,
}

/// Drives identity provisioning, materialization and installation.
pub struct Provisioner {
    layout: Layout,
    staging_root: PathBuf,
    invocation_dir: PathBuf,
    git_ops: Box<dyn GitOperations>,
    key_ops: Box<dyn KeyOperations>,
}

impl Provisioner {
    /// Provisioner using the system `git` and `ssh-keygen`.
    pub fn new(layout: Layout, staging_root: PathBuf, invocation_dir: PathBuf) -> Self {
        Self::with_operations(
            layout,
            staging_root,
            invocation_dir,
            Box::new(DefaultGitOperations),
            Box::new(DefaultKeyOperations),
        )
    }

    /// Provisioner with custom process implementations, mainly for tests.
    pub fn with_operations(
        layout: Layout,
        staging_root: PathBuf,
        invocation_dir: PathBuf,
        git_ops: Box<dyn GitOperations>,
        key_ops: Box<dyn KeyOperations>,
    ) -> Self {
        Self {
            layout,
            staging_root,
            invocation_dir,
            git_ops,
            key_ops,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Parse the manifest at `manifest_path` and provision it.
    ///
    /// The store roots are created before the manifest is read.
    pub fn run(&self, manifest_path: &Path) -> Result<ProvisionReport> {
        self.layout.ensure_roots()?;
        let manifest = manifest::from_file(manifest_path)?;
        self.provision(&manifest)
    }

    /// Provision an already parsed manifest.
    pub fn provision(&self, manifest: &Manifest) -> Result<ProvisionReport> {
        self.layout.ensure_roots()?;

        let mut report = ProvisionReport::default();
        let mut materializer = Materializer::new(
            self.git_ops.as_ref(),
            &self.staging_root,
            &self.invocation_dir,
        );
        let installer = Installer::new(&self.layout, self.git_ops.as_ref());

        for (user, user_spec) in &manifest.users {
            report.users += 1;
            if identity::ensure_user(&self.layout, self.key_ops.as_ref(), user)? {
                report.keys_generated += 1;
            }

            for spec in user_spec.repos.values() {
                match installer.install(&mut materializer, user, spec)? {
                    InstallOutcome::AlreadyPresent => report.repos_skipped += 1,
                    InstallOutcome::Installed { clone } => {
                        report.repos_installed += 1;
                        if !clone.is_cloned() {
                            report.clone_failures += 1;
                        }
                    }
                }
            }
        }

        report.repos_materialized = materializer.materialized();
        report.clone_failures += materializer.clone_failures();

        info!(
            "provisioned {} users: {} repositories installed, {} already present",
            report.users, report.repos_installed, report.repos_skipped
        );
        Ok(report)
    }
}
