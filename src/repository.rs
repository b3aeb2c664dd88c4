//! # Repository Materialization
//!
//! This module provides the [`Materializer`], which produces one canonical
//! bare copy of each named repository in a staging area. Installing the same
//! repository for many users then only costs a local clone from staging.
//!
//! ## Design
//!
//! Process execution sits behind the [`GitOperations`] trait.
//! [`DefaultGitOperations`] runs the real `git` and generator programs; tests
//! substitute mocks that record calls, which is how deduplication and
//! generator path resolution are checked without touching the network.

use crate::cache::StagingCache;
use crate::error::Result;
use crate::git::CloneOutcome;
use crate::layout::bare_dir_name;
use crate::manifest::{Origin, RepoSpec};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Trait for git and generator operations - allows mocking in tests
pub trait GitOperations {
    /// Bare-clones `source` into `target_dir`. An unsuccessful clone is a
    /// [`CloneOutcome::Failed`], not an error.
    fn clone_bare(&self, source: &str, target_dir: &Path) -> Result<CloneOutcome>;

    /// Runs a generator program in `working_dir`, failing on non-zero exit.
    fn run_generator(
        &self,
        repo: &str,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command and spawns generators directly.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_bare(&self, source: &str, target_dir: &Path) -> Result<CloneOutcome> {
        crate::git::clone_bare(source, target_dir)
    }

    fn run_generator(
        &self,
        repo: &str,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> Result<()> {
        crate::git::run_generator(repo, program, args, working_dir)
    }
}

/// Builds staging copies of repositories, at most once per name.
pub struct Materializer<'a> {
    git_ops: &'a dyn GitOperations,
    staging_root: PathBuf,
    invocation_dir: PathBuf,
    cache: StagingCache,
    clone_failures: usize,
}

impl<'a> Materializer<'a> {
    /// `invocation_dir` anchors relative generator paths; generators still
    /// run inside `staging_root`.
    pub fn new(
        git_ops: &'a dyn GitOperations,
        staging_root: impl Into<PathBuf>,
        invocation_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            git_ops,
            staging_root: staging_root.into(),
            invocation_dir: invocation_dir.into(),
            cache: StagingCache::new(),
            clone_failures: 0,
        }
    }

    /// Returns the staging path of `spec`, materializing it on first use.
    ///
    /// For cloned repositories the path is recorded even if the clone
    /// failed, so a broken source is attempted only once per run.
    pub fn materialize(&mut self, spec: &RepoSpec) -> Result<PathBuf> {
        let git_ops = self.git_ops;
        let staging_root = &self.staging_root;
        let invocation_dir = &self.invocation_dir;
        let clone_failures = &mut self.clone_failures;

        self.cache.get_or_materialize(&spec.name, &spec.origin, || {
            fs::create_dir_all(staging_root)?;
            let target = staging_root.join(bare_dir_name(&spec.name));

            match &spec.origin {
                Origin::Generate(command) => {
                    let program = invocation_dir.join(&command.program);
                    git_ops.run_generator(&spec.name, &program, &command.args, staging_root)?;
                    if !target.exists() {
                        warn!(
                            "generator for '{}' did not create {}",
                            spec.name,
                            target.display()
                        );
                    }
                }
                Origin::Clone(source) => {
                    if let CloneOutcome::Failed { stderr } = git_ops.clone_bare(source, &target)? {
                        *clone_failures += 1;
                        warn!("could not clone {} for '{}': {}", source, spec.name, stderr);
                    }
                }
            }

            info!("materialized '{}' in {}", spec.name, target.display());
            Ok(target)
        })
    }

    /// Directory holding the staging copies
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Number of distinct repositories materialized so far
    pub fn materialized(&self) -> usize {
        self.cache.len()
    }

    /// Number of source clones that failed and were tolerated
    pub fn clone_failures(&self) -> usize {
        self.clone_failures
    }

    pub fn is_materialized(&self, name: &str) -> bool {
        self.cache.contains(name)
    }
}
