//! # CLI Command Implementations
//!
//! The `gin-mkdata` binary has a single job, provisioning a store from a
//! manifest, implemented in [`provision`]. The module follows the usual
//! layout:
//! - An `Args` struct that defines the command's arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and calls into the
//!   `gin_mkdata` library.

pub mod provision;
