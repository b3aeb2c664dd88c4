//! # Error Handling
//!
//! This module defines the centralized error type for `gin-mkdata`. It uses
//! `thiserror` to build an `Error` enum covering every failure that aborts a
//! provisioning run.
//!
//! ## Key Components
//!
//! - **`Error`**: All fatal failure modes. Each variant carries enough
//!   context (user, repository, command, path) to tell which step of the run
//!   stopped.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Clone failures are not errors here: a failed
//! `git clone` is reported through [`crate::git::CloneOutcome`] and the run
//! continues.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for gin-mkdata operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest is structurally valid YAML but does not describe a valid
    /// set of users and repositories.
    #[error("Manifest error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// `ssh-keygen` could not be run or exited unsuccessfully.
    #[error("Key generation failed for user {user}: {message}")]
    KeyGen { user: String, message: String },

    /// A repository generator program could not be run or exited
    /// unsuccessfully.
    #[error("Generator for repository {repo} failed ({command}): {message}")]
    Generator {
        repo: String,
        command: String,
        message: String,
    },

    /// The `git` executable could not be spawned at all.
    #[error("Git command failed: {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// The `gin/` sidecar of an installed repository could not be written.
    #[error("Sidecar error at {}: {message}", path.display())]
    Sidecar { path: PathBuf, message: String },

    /// A glob pattern used to scan the store was invalid.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
