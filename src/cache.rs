//! In-process cache of materialized repositories

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::Result;
use crate::manifest::Origin;

#[derive(Debug, Clone)]
struct StagingEntry {
    origin: Origin,
    path: PathBuf,
}

/// Maps repository names to their staging copies for a single run.
///
/// The key is the name alone. When two users define the same name with
/// different origins, the first definition wins and the later one is
/// reported.
#[derive(Debug, Clone, Default)]
pub struct StagingCache {
    entries: HashMap<String, StagingEntry>,
}

impl StagingCache {
    /// Create a new empty staging cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the staging path for `name`, or materialize it and remember the
    /// result if not present.
    ///
    /// A failing `materialize` leaves the cache untouched.
    pub fn get_or_materialize<F>(&mut self, name: &str, origin: &Origin, materialize: F) -> Result<PathBuf>
    where
        F: FnOnce() -> Result<PathBuf>,
    {
        if let Some(entry) = self.entries.get(name) {
            if &entry.origin != origin {
                warn!(
                    "repository '{}' is defined with different origins; reusing the first ({:?})",
                    name, entry.origin
                );
            }
            return Ok(entry.path.clone());
        }

        let path = materialize()?;
        self.entries.insert(
            name.to_string(),
            StagingEntry {
                origin: origin.clone(),
                path: path.clone(),
            },
        );
        Ok(path)
    }

    /// Staging path recorded for `name`, if any
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(|entry| entry.path.as_path())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
