//! # gin-mkdata Library
//!
//! This library provisions a sample filesystem layout for a gin repository
//! store: per-user SSH identities plus a set of bare repositories with their
//! visibility and sharing metadata, all described by a YAML manifest.
//!
//! ## Quick Example
//!
//! ```
//! use gin_mkdata::manifest::{self, Origin};
//!
//! let manifest = manifest::parse(r#"
//! users:
//!   alice:
//!     repos:
//!       demo:
//!         clone: https://example.com/demo.git
//!         public: true
//!         shared:
//!           bob: rw
//! "#).unwrap();
//!
//! let demo = &manifest.users["alice"].repos["demo"];
//! assert_eq!(demo.name, "demo");
//! assert!(matches!(demo.origin, Origin::Clone(_)));
//! assert_eq!(demo.shared["bob"], "rw");
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: The declarative input, users mapped to their
//!   repositories.
//! - **Layout (`layout`)**: Where users, keys and repositories live under the
//!   store root.
//! - **Identities (`identity`)**: One RSA key per user, generated once.
//! - **Materialization (`repository`, `cache`, `git`)**: Each repository name
//!   is cloned or generated once into a staging area and reused for every
//!   user that lists it.
//! - **Installation (`install`, `sidecar`)**: Per-user bare clones from
//!   staging, with a `gin/` sidecar carrying the public marker and sharing
//!   levels.
//! - **Inventory (`store`)**: Read-only listing of what a store contains.
//!
//! ## Execution Flow
//!
//! [`provision::Provisioner`] walks the manifest in document order. For each
//! user it ensures the identity exists, then installs each repository,
//! materializing it on first use. Existing keys and repositories are left
//! alone, so running the same manifest again does nothing.

pub mod cache;
pub mod defaults;
pub mod error;
pub mod git;
pub mod identity;
pub mod install;
pub mod layout;
pub mod manifest;
pub mod provision;
pub mod repository;
pub mod sidecar;
pub mod store;
