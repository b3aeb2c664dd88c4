//! Store layout: where every provisioned artifact lives on disk.
//!
//! ```text
//! <root>/
//!   users/<user>/<user>ssh.key(.pub)
//!   repos/git/<user>/<name>.git/
//!     gin/public
//!     gin/sharing/<peer>
//! ```
//!
//! The staging area is kept separate from the root so it can live in a
//! process-temporary directory.

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the sidecar directory inside an installed bare repository.
pub const SIDECAR_DIR: &str = "gin";
/// Marker file making a repository public.
pub const PUBLIC_MARKER: &str = "public";
/// Directory holding one file per shared peer.
pub const SHARING_DIR: &str = "sharing";

/// Paths of a store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    pub fn repos_dir(&self) -> PathBuf {
        self.root.join("repos")
    }

    /// `repos/git`, the directory the hosting service serves from.
    pub fn git_dir(&self) -> PathBuf {
        self.repos_dir().join("git")
    }

    pub fn user_dir(&self, user: &str) -> PathBuf {
        self.users_dir().join(user)
    }

    /// Private key path; the public half sits next to it with a `.pub`
    /// suffix.
    pub fn key_path(&self, user: &str) -> PathBuf {
        self.user_dir(user).join(format!("{}ssh.key", user))
    }

    pub fn user_repos_dir(&self, user: &str) -> PathBuf {
        self.git_dir().join(user)
    }

    pub fn repo_path(&self, user: &str, name: &str) -> PathBuf {
        self.user_repos_dir(user).join(bare_dir_name(name))
    }

    /// Create `users/` and `repos/` if they are missing.
    pub fn ensure_roots(&self) -> Result<()> {
        fs::create_dir_all(self.users_dir())?;
        fs::create_dir_all(self.repos_dir())?;
        Ok(())
    }
}

/// `<name>.git`
pub fn bare_dir_name(name: &str) -> String {
    format!("{}.git", name)
}
