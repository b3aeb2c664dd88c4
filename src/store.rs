//! Read-only view of a provisioned store.
//!
//! Mirrors how the hosting service discovers repositories: installed
//! repositories are `repos/git/<owner>/<name>.git`, public ones carry
//! `gin/public`, and a repository is shared with `<user>` when
//! `gin/sharing/<user>` exists.

use std::fmt;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::Result;
use crate::layout::{bare_dir_name, Layout, PUBLIC_MARKER, SHARING_DIR, SIDECAR_DIR};
use crate::sidecar::{self, RepoAccess};

/// Owner and name of an installed repository.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Recover the id from a `<owner>/<name>.git` directory.
    fn from_repo_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.strip_suffix(".git")?;
        let owner = path.parent()?.file_name()?.to_str()?;
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

pub struct RepoStore<'a> {
    layout: &'a Layout,
}

impl<'a> RepoStore<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Every installed repository, sorted by owner then name.
    pub fn list_repos(&self) -> Result<Vec<RepoId>> {
        self.scan(&[], 0)
    }

    /// Repositories carrying the public marker.
    pub fn list_public(&self) -> Result<Vec<RepoId>> {
        self.scan(&[SIDECAR_DIR, PUBLIC_MARKER], 2)
    }

    /// Repositories with a sharing entry for `user`.
    pub fn list_shared_with(&self, user: &str) -> Result<Vec<RepoId>> {
        let user = Pattern::escape(user);
        self.scan(&[SIDECAR_DIR, SHARING_DIR, user.as_str()], 3)
    }

    /// Visibility and sharing of one repository.
    pub fn access(&self, id: &RepoId) -> Result<RepoAccess> {
        sidecar::read(&self.layout.repo_path(&id.owner, &id.name))
    }

    /// Glob `repos/git/*/*.git/<suffix..>` and map each hit back to its
    /// repository, `depth` components above the match.
    fn scan(&self, suffix: &[&str], depth: usize) -> Result<Vec<RepoId>> {
        let base = Pattern::escape(&self.layout.git_dir().to_string_lossy());
        let mut pattern = PathBuf::from(base);
        pattern.push("*");
        pattern.push(bare_dir_name("*"));
        for component in suffix {
            pattern.push(component);
        }

        let mut repos = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let hit = entry.map_err(|e| e.into_error())?;
            let repo_dir = hit.ancestors().nth(depth);
            if let Some(id) = repo_dir.and_then(RepoId::from_repo_path) {
                repos.push(id);
            }
        }
        repos.sort();
        Ok(repos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use std::fs;
    use tempfile::TempDir;

    fn install(layout: &Layout, owner: &str, name: &str, public: bool, peers: &[(&str, &str)]) {
        let shared: IndexMap<String, String> = peers
            .iter()
            .map(|(p, l)| (p.to_string(), l.to_string()))
            .collect();
        sidecar::write(&layout.repo_path(owner, name), public, &shared).unwrap();
    }

    #[test]
    fn test_store_listing() {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::new(temp_dir.path());
        install(&layout, "bob", "demo", true, &[("alice", "rw")]);
        install(&layout, "alice", "notes", false, &[("bob", "ro"), ("carol", "rw")]);
        install(&layout, "alice", "demo", true, &[]);
        // Not a repository: no .git suffix
        fs::create_dir_all(layout.git_dir().join("alice/scratch")).unwrap();

        let store = RepoStore::new(&layout);
        assert_eq!(
            store.list_repos().unwrap(),
            [
                RepoId::new("alice", "demo"),
                RepoId::new("alice", "notes"),
                RepoId::new("bob", "demo"),
            ]
        );
        assert_eq!(
            store.list_public().unwrap(),
            [RepoId::new("alice", "demo"), RepoId::new("bob", "demo")]
        );
        assert_eq!(
            store.list_shared_with("alice").unwrap(),
            [RepoId::new("bob", "demo")]
        );
        assert_eq!(
            store.list_shared_with("carol").unwrap(),
            [RepoId::new("alice", "notes")]
        );
        assert!(store.list_shared_with("zoe").unwrap().is_empty());

        let access = store.access(&RepoId::new("alice", "notes")).unwrap();
        assert!(!access.public);
        assert_eq!(access.sharing["bob"], "ro");
    }

    #[test]
    fn test_store_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::new(temp_dir.path().join("does-not-exist"));
        let store = RepoStore::new(&layout);
        assert!(store.list_repos().unwrap().is_empty());
        assert!(store.list_public().unwrap().is_empty());
    }

    #[test]
    fn test_repo_id_display_and_parse() {
        let id = RepoId::from_repo_path(Path::new("/srv/repos/git/bob/demo.git")).unwrap();
        assert_eq!(id, RepoId::new("bob", "demo"));
        assert_eq!(id.to_string(), "bob/demo");
        assert!(RepoId::from_repo_path(Path::new("/srv/repos/git/bob/demo")).is_none());
    }
}
