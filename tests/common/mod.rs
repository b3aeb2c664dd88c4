//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then `use common::prelude::*;`.

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// One repository, public and shared with two peers.
    pub const SHARED_DEMO: &str = r#"
users:
  bob:
    repos:
      demo:
        clone: /nonexistent/source.git
        public: true
        shared:
          alice: rw
          carol: ro
"#;

    /// Same repository for two users, built by a generator script.
    pub const GENERATED_FOR_TWO: &str = r#"
users:
  alice:
    repos:
      demo:
        generate: scripts/mkrepo.sh demo
        public: true
        shared:
          bob: rw
          carol: ro
  bob:
    repos:
      demo:
        generate: scripts/mkrepo.sh demo
      plain:
        generate: scripts/mkrepo.sh plain
"#;

    /// Repository with neither `generate` nor `clone`.
    pub const NO_ORIGIN: &str = r#"
users:
  alice:
    repos:
      demo:
        public: true
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "users: [unclosed";
}

/// A temporary store root with helpers to pre-populate it.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `manifest.yml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("manifest.yml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Pretend `user` already has a key, so no `ssh-keygen` run is needed.
    pub fn with_key(self, user: &str) -> Self {
        self.temp_dir
            .child(format!("users/{user}/{user}ssh.key"))
            .write_str("existing key")
            .expect("Failed to write key");
        self
    }

    /// Pretend `user/name` is already installed with the given sharing.
    pub fn with_installed_repo(self, user: &str, name: &str, shared: &[(&str, &str)]) -> Self {
        let repo = self.temp_dir.child(format!("repos/git/{user}/{name}.git"));
        repo.child("gin")
            .create_dir_all()
            .expect("Failed to create sidecar");
        for (peer, level) in shared {
            repo.child(format!("gin/sharing/{peer}"))
                .write_str(level)
                .expect("Failed to write sharing");
        }
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("manifest.yml")
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
