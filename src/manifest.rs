//! # Manifest Schema and Parsing
//!
//! This module defines the data structures for the provisioning manifest and
//! the logic for parsing it from YAML.
//!
//! ```yaml
//! users:
//!   alice:
//!     repos:
//!       demo:
//!         generate: scripts/mkrepo.sh demo
//!         public: true
//!         shared:
//!           bob: rw
//!   bob:
//!     repos:
//!       upstream:
//!         clone: https://example.com/upstream.git
//! ```
//!
//! Parsing happens in two steps. The document is first deserialized into
//! loosely typed raw structures, then validated into [`Manifest`]. The second
//! step is where the repository name is injected from its mapping key and
//! where the `generate`/`clone` choice is enforced, so errors can name the
//! offending user and repository.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// The whole provisioning manifest: users in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub users: IndexMap<String, UserSpec>,
}

/// The repositories owned by one user, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSpec {
    pub repos: IndexMap<String, RepoSpec>,
}

/// A single repository definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    /// Repository name, taken from the manifest key.
    pub name: String,
    /// Where the repository content comes from.
    pub origin: Origin,
    /// Whether the installed repository gets a `gin/public` marker.
    pub public: bool,
    /// Peer user name to sharing level. Levels are opaque and written
    /// verbatim.
    pub shared: IndexMap<String, String>,
}

/// Content origin of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Run a generator program that creates `<name>.git` in its working
    /// directory.
    Generate(GeneratorCommand),
    /// Bare-clone a local path or URL.
    Clone(String),
}

/// A generator command line split into program and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCommand {
    /// The command line as written in the manifest.
    pub line: String,
    /// First token. Relative paths are resolved against the invocation
    /// directory, not the staging directory.
    pub program: String,
    pub args: Vec<String>,
}

impl GeneratorCommand {
    /// Split a command line using POSIX shell quoting rules.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = shlex::split(line)?.into_iter();
        let program = tokens.next()?;
        Some(Self {
            line: line.to_string(),
            program,
            args: tokens.collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    users: IndexMap<String, Option<RawUserSpec>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUserSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    repos: IndexMap<String, RawRepoSpec>,
}

#[derive(Debug, Deserialize)]
struct RawRepoSpec {
    #[serde(default)]
    generate: Option<String>,
    #[serde(default)]
    clone: Option<String>,
    #[serde(default)]
    public: Option<serde_yaml::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    shared: IndexMap<String, String>,
}

/// Treat an explicit YAML `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a manifest from a YAML string.
pub fn parse(yaml_content: &str) -> Result<Manifest> {
    let raw: RawManifest = serde_yaml::from_str(yaml_content)?;

    let mut users = IndexMap::with_capacity(raw.users.len());
    for (user, raw_user) in raw.users {
        check_component("user", &user)?;
        let raw_user = raw_user.unwrap_or_default();
        if raw_user.repos.is_empty() {
            users.insert(user, UserSpec::default());
            continue;
        }
        let mut repos = IndexMap::with_capacity(raw_user.repos.len());
        for (name, raw_repo) in raw_user.repos {
            let spec = validate_repo(&user, name.clone(), raw_repo)?;
            repos.insert(name, spec);
        }
        users.insert(user, UserSpec { repos });
    }

    Ok(Manifest { users })
}

/// Read and parse a manifest file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

fn validate_repo(user: &str, name: String, raw: RawRepoSpec) -> Result<RepoSpec> {
    check_component("repository", &name)?;

    let origin = match (raw.generate, raw.clone) {
        (Some(line), None) => {
            let command = GeneratorCommand::parse(&line).ok_or_else(|| Error::ManifestParse {
                message: format!(
                    "repository '{}' of user '{}' has an unusable generate command: {:?}",
                    name, user, line
                ),
                hint: Some("Check for unbalanced quotes or an empty command".to_string()),
            })?;
            Origin::Generate(command)
        }
        (None, Some(source)) => Origin::Clone(source),
        (Some(_), Some(_)) => {
            return Err(Error::ManifestParse {
                message: format!(
                    "repository '{}' of user '{}' sets both 'generate' and 'clone'",
                    name, user
                ),
                hint: Some("Keep exactly one of 'generate:' or 'clone:'".to_string()),
            })
        }
        (None, None) => {
            return Err(Error::ManifestParse {
                message: format!(
                    "repository '{}' of user '{}' has no content origin",
                    name, user
                ),
                hint: Some("Add either 'generate:' or 'clone:'".to_string()),
            })
        }
    };

    for peer in raw.shared.keys() {
        check_component("shared peer", peer)?;
    }

    Ok(RepoSpec {
        name,
        origin,
        public: presence_flag(raw.public.as_ref()),
        shared: raw.shared,
    })
}

/// `public:` is set by presence; only an absent key or null leaves it unset.
fn presence_flag(value: Option<&serde_yaml::Value>) -> bool {
    !matches!(value, None | Some(serde_yaml::Value::Null))
}

/// Names become single path components in the store layout.
fn check_component(kind: &str, value: &str) -> Result<()> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\');
    if bad {
        return Err(Error::ManifestParse {
            message: format!("invalid {} name: {:?}", kind, value),
            hint: Some("Names must be a single, non-empty path component".to_string()),
        });
    }
    Ok(())
}
