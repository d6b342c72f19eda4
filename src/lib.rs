//! Plugin provisioning for the lintplug static analysis tool.
//!
//! `lintplug init` reads the `[[plugin]]` declarations of one or many
//! working directories and installs every plugin that is not on disk yet.

pub mod cli;
pub mod error;
pub mod init;
pub mod logging;
pub mod model;
pub mod plugin;
pub mod workdir;

pub use error::InitError;
pub use init::{InitOptions, RunSummary, run_init};
