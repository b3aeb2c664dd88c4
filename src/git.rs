//! External processes: `git clone --bare`, generator programs and
//! `ssh-keygen`.
//!
//! Clones are best-effort. A clone that runs but exits unsuccessfully yields
//! [`CloneOutcome::Failed`] instead of an error, and the caller decides what
//! to do with it. Only a `git` binary that cannot be spawned at all is an
//! error.

use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Result of a best-effort bare clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloned,
    Failed { stderr: String },
}

impl CloneOutcome {
    pub fn is_cloned(&self) -> bool {
        matches!(self, CloneOutcome::Cloned)
    }
}

/// Bare-clone `source` into `target_dir`.
///
/// This uses the system git command, so credentials, SSH agents and
/// `~/.gitconfig` all apply as they would for an interactive clone.
pub fn clone_bare(source: &str, target_dir: &Path) -> Result<CloneOutcome> {
    debug!("git clone --bare {} {}", source, target_dir.display());

    let output = Command::new("git")
        .args(["clone", "--bare", "--quiet", source])
        .arg(target_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("clone --bare {}", source),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Ok(CloneOutcome::Failed {
            stderr: format!("{} ({})", stderr.trim(), output.status),
        });
    }

    Ok(CloneOutcome::Cloned)
}

/// Run a generator program to completion with `working_dir` as its current
/// directory.
pub fn run_generator(repo: &str, program: &Path, args: &[String], working_dir: &Path) -> Result<()> {
    let command_line = describe(program, args);
    debug!("generating {} in {}: {}", repo, working_dir.display(), command_line);

    let output = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::Generator {
            repo: repo.to_string(),
            command: command_line.clone(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Generator {
            repo: repo.to_string(),
            command: command_line,
            message: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    Ok(())
}

/// Bits of the RSA keys handed out to users.
pub const KEY_BITS: u32 = 4096;

/// Generate an unencrypted RSA key pair at `key_path` with `user` as the
/// comment.
pub fn ssh_keygen(user: &str, key_path: &Path) -> Result<()> {
    debug!("ssh-keygen for {} at {}", user, key_path.display());

    let bits = KEY_BITS.to_string();
    let output = Command::new("ssh-keygen")
        .args(["-q", "-t", "rsa", "-b", &bits, "-C", user, "-P", "", "-f"])
        .arg(key_path)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| Error::KeyGen {
            user: user.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::KeyGen {
            user: user.to_string(),
            message: format!("{}: {}", output.status, stderr.trim()),
        });
    }

    Ok(())
}

fn describe(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
