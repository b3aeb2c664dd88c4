//! Default values for gin-mkdata runs.
//!
//! Shared by the CLI and the library so flags, environment fallbacks and
//! tests agree on the same values.

use std::io;

use tempfile::TempDir;

/// Log filter used when neither `--log-level` nor `RUST_LOG` is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Prefix of the temporary staging directory.
pub const STAGING_DIR_PREFIX: &str = "gin-mkdata-";

/// Creates a fresh staging directory under the system temp dir.
///
/// The directory and everything staged in it is removed when the returned
/// handle is dropped. Overridden by the `--staging-dir` CLI flag or the
/// `GIN_MKDATA_STAGING` environment variable.
pub fn default_staging_dir() -> io::Result<TempDir> {
    tempfile::Builder::new()
        .prefix(STAGING_DIR_PREFIX)
        .tempdir()
}
