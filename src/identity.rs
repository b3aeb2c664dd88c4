//! Per-user SSH identities.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::Result;
use crate::layout::Layout;

/// Trait for key generation - allows mocking in tests
pub trait KeyOperations {
    /// Generate an RSA key pair at `key_path` with `user` as the comment and
    /// no passphrase.
    fn generate_key(&self, user: &str, key_path: &Path) -> Result<()>;
}

/// Runs the system `ssh-keygen`.
pub struct DefaultKeyOperations;

impl KeyOperations for DefaultKeyOperations {
    fn generate_key(&self, user: &str, key_path: &Path) -> Result<()> {
        crate::git::ssh_keygen(user, key_path)
    }
}

/// Make sure `users/<user>/` and the user's key exist.
///
/// Returns `true` when a new key was generated. An existing key is never
/// touched, whatever its contents.
pub fn ensure_user(layout: &Layout, keys: &dyn KeyOperations, user: &str) -> Result<bool> {
    let base = layout.user_dir(user);
    if !base.exists() {
        fs::create_dir_all(&base)?;
    }

    let key = layout.key_path(user);
    if key.exists() {
        debug!("key for {} already present at {}", user, key.display());
        return Ok(false);
    }

    keys.generate_key(user, &key)?;
    info!("generated key for {}", user);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Writes placeholder key files and records every call
    #[derive(Default)]
    struct MockKeyOperations {
        calls: RefCell<Vec<(String, PathBuf)>>,
        fail: bool,
    }

    impl KeyOperations for MockKeyOperations {
        fn generate_key(&self, user: &str, key_path: &Path) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((user.to_string(), key_path.to_path_buf()));
            if self.fail {
                return Err(Error::KeyGen {
                    user: user.to_string(),
                    message: "exit status: 1".to_string(),
                });
            }
            fs::write(key_path, "private")?;
            fs::write(key_path.with_extension("key.pub"), "public")?;
            Ok(())
        }
    }

    #[test]
    fn test_ensure_user_generates_once() {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::new(temp_dir.path());
        let keys = MockKeyOperations::default();

        assert!(ensure_user(&layout, &keys, "alice").unwrap());
        assert!(!ensure_user(&layout, &keys, "alice").unwrap());

        let calls = keys.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "alice");
        assert_eq!(calls[0].1, temp_dir.path().join("users/alice/alicessh.key"));
        assert!(temp_dir.path().join("users/alice/alicessh.key.pub").exists());
    }

    #[test]
    fn test_ensure_user_keeps_existing_key() {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::new(temp_dir.path());
        fs::create_dir_all(layout.user_dir("bob")).unwrap();
        fs::write(layout.key_path("bob"), "handmade").unwrap();
        let keys = MockKeyOperations::default();

        assert!(!ensure_user(&layout, &keys, "bob").unwrap());
        assert!(keys.calls.borrow().is_empty());
        assert_eq!(fs::read_to_string(layout.key_path("bob")).unwrap(), "handmade");
    }

    #[test]
    fn test_ensure_user_propagates_keygen_failure() {
        let temp_dir = TempDir::new().unwrap();
        let layout = Layout::new(temp_dir.path());
        let keys = MockKeyOperations {
            fail: true,
            ..Default::default()
        };

        let err = ensure_user(&layout, &keys, "carol").unwrap_err();
        assert!(matches!(err, Error::KeyGen { ref user, .. } if user == "carol"));
        // The base directory is created before the key is attempted.
        assert!(layout.user_dir("carol").is_dir());
    }
}
