use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::plugin::install_config::InstallConfig;

#[derive(Debug, Error)]
pub enum LookupError {
    /// Nothing installed yet. Callers treat this as "install now".
    #[error("plugin binary not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{} is not a file", path.display())]
    NotAFile { path: PathBuf },

    #[error("failed to inspect {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

/// Finds the binary of an already installed plugin.
pub trait PluginLocator {
    fn find(&self, install: &InstallConfig) -> Result<PathBuf, LookupError>;
}

/// Looks for the binary at [`InstallConfig::install_path`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLocator;

impl PluginLocator for FsLocator {
    fn find(&self, install: &InstallConfig) -> Result<PathBuf, LookupError> {
        let path = install.install_path();

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(LookupError::NotAFile { path }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(LookupError::NotFound { path }),
            Err(source) => Err(LookupError::Io { path, source }),
        }
    }
}
