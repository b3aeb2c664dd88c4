//! # Access-Control Sidecar
//!
//! Every installed repository carries a `gin/` directory next to its git
//! data. The hosting service reads visibility and sharing from it:
//!
//! - `gin/public` is an empty marker; its presence makes the repository
//!   public.
//! - `gin/sharing/<peer>` holds the sharing level granted to `<peer>`. The
//!   level is free-form text defined by the hosting service and is stored
//!   verbatim.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;

use crate::error::{Error, Result};
use crate::layout::{PUBLIC_MARKER, SHARING_DIR, SIDECAR_DIR};

/// Visibility and sharing of one repository, as read back from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoAccess {
    pub public: bool,
    /// Peer to level, sorted by peer name.
    pub sharing: BTreeMap<String, String>,
}

pub fn sidecar_dir(repo_path: &Path) -> PathBuf {
    repo_path.join(SIDECAR_DIR)
}

/// Write the sidecar of a freshly installed repository.
///
/// The `gin/` directory itself must not exist yet: finding one is an error,
/// since the caller only writes sidecars for repositories it just created.
/// `sharing/` is created once, and only when there is at least one peer.
pub fn write(repo_path: &Path, public: bool, shared: &IndexMap<String, String>) -> Result<()> {
    let gin = sidecar_dir(repo_path);

    // A failed clone leaves no destination behind; the sidecar still goes in.
    fs::create_dir_all(repo_path)?;
    fs::create_dir(&gin).map_err(|e| Error::Sidecar {
        path: gin.clone(),
        message: e.to_string(),
    })?;

    if public {
        let marker = gin.join(PUBLIC_MARKER);
        fs::File::create(&marker)?;
        debug!("marked {} public", repo_path.display());
    }

    if shared.is_empty() {
        return Ok(());
    }

    let sharing = gin.join(SHARING_DIR);
    fs::create_dir_all(&sharing).map_err(|e| Error::Sidecar {
        path: sharing.clone(),
        message: e.to_string(),
    })?;
    for (peer, level) in shared {
        fs::write(sharing.join(peer), level)?;
        debug!("shared {} with {} ({})", repo_path.display(), peer, level);
    }

    Ok(())
}

/// Read the sidecar of an installed repository.
///
/// A missing marker or sharing directory means "not public" and "not
/// shared"; only real I/O failures are errors.
pub fn read(repo_path: &Path) -> Result<RepoAccess> {
    let gin = sidecar_dir(repo_path);
    let public = gin.join(PUBLIC_MARKER).exists();

    let mut sharing = BTreeMap::new();
    let entries = match fs::read_dir(gin.join(SHARING_DIR)) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(RepoAccess { public, sharing });
        }
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let peer = entry.file_name().to_string_lossy().into_owned();
        let level = fs::read_to_string(entry.path())?;
        sharing.insert(peer, level);
    }

    Ok(RepoAccess { public, sharing })
}
