use std::env;
use std::path::{Path, PathBuf};

use crate::error::InitError;

/// Runs work with a working directory made current, restoring the previous
/// one afterwards on every path.
pub trait WorkingContext {
    fn within(
        &self,
        dir: &Path,
        f: &mut dyn FnMut() -> Result<(), InitError>,
    ) -> Result<(), InitError>;
}

/// Switches the process-wide current directory. Only one directory can be
/// current at a time, so callers must not run these scopes concurrently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessDir;

impl WorkingContext for ProcessDir {
    fn within(
        &self,
        dir: &Path,
        f: &mut dyn FnMut() -> Result<(), InitError>,
    ) -> Result<(), InitError> {
        let _guard = ChangedDir::enter(dir)?;
        f()
    }
}

/// Restores the previous current directory when dropped.
#[derive(Debug)]
pub struct ChangedDir {
    previous: PathBuf,
}

impl ChangedDir {
    pub fn enter(dir: &Path) -> Result<Self, InitError> {
        let change_err = |source| InitError::ChangeDir {
            dir: dir.to_path_buf(),
            source,
        };

        let previous = env::current_dir().map_err(change_err)?;
        env::set_current_dir(dir).map_err(change_err)?;
        tracing::trace!("entered {}", dir.display());

        Ok(Self { previous })
    }
}

impl Drop for ChangedDir {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.previous) {
            tracing::error!(
                "failed to restore working directory {}: {err}",
                self.previous.display()
            );
        }
    }
}
