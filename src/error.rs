use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::config::ConfigError;
use crate::plugin::installer::InstallError;
use crate::plugin::locator::LookupError;

/// Failures that abort an `init` run.
///
/// Every variant is fatal for the directory being processed and halts the
/// run; nothing is retried.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to find working directories")]
    FindWorkingDirs(#[source] io::Error),

    #[error("failed to enter working directory {}", dir.display())]
    ChangeDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to load config")]
    ConfigLoad(#[source] ConfigError),

    #[error("failed to find plugin \"{name}\"")]
    PluginLookup {
        name: String,
        #[source]
        source: LookupError,
    },

    #[error("failed to install plugin \"{name}\"")]
    Install {
        name: String,
        #[source]
        source: InstallError,
    },

    #[error("failed to write output")]
    Output(#[from] io::Error),
}
