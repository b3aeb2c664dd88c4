//! Installing per-user repositories from staging.

use std::fs;

use log::{debug, info, warn};

use crate::error::Result;
use crate::git::CloneOutcome;
use crate::layout::Layout;
use crate::manifest::RepoSpec;
use crate::repository::{GitOperations, Materializer};
use crate::sidecar;

/// What [`Installer::install`] did for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The destination already existed; nothing was touched.
    AlreadyPresent,
    /// The destination and its sidecar were created. `clone` reports whether
    /// the repository content actually made it.
    Installed { clone: CloneOutcome },
}

/// Clones staged repositories into `repos/git/<user>/<name>.git` and writes
/// their sidecars.
pub struct Installer<'a> {
    layout: &'a Layout,
    git_ops: &'a dyn GitOperations,
}

impl<'a> Installer<'a> {
    pub fn new(layout: &'a Layout, git_ops: &'a dyn GitOperations) -> Self {
        Self { layout, git_ops }
    }

    /// Install `spec` for `user`.
    ///
    /// An existing destination short-circuits everything, including the
    /// sidecar, so later manifest edits never reach an installed repository.
    pub fn install(
        &self,
        materializer: &mut Materializer<'_>,
        user: &str,
        spec: &RepoSpec,
    ) -> Result<InstallOutcome> {
        let dest = self.layout.repo_path(user, &spec.name);
        if dest.exists() {
            debug!("{} already installed at {}", spec.name, dest.display());
            return Ok(InstallOutcome::AlreadyPresent);
        }

        fs::create_dir_all(self.layout.user_repos_dir(user))?;

        let staging = materializer.materialize(spec)?;
        let clone = self
            .git_ops
            .clone_bare(&staging.to_string_lossy(), &dest)?;
        if let CloneOutcome::Failed { stderr } = &clone {
            warn!(
                "could not install {} for {} from {}: {}",
                spec.name,
                user,
                staging.display(),
                stderr
            );
        }

        sidecar::write(&dest, spec.public, &spec.shared)?;
        info!("installed {}/{}", user, spec.name);

        Ok(InstallOutcome::Installed { clone })
    }
}
