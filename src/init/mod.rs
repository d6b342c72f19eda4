//! `lintplug init`: install the plugins each working directory declares.
//!
//! Directories are processed one at a time, in the order they were found.
//! The first failure stops the run; later directories are never entered.

pub mod context;
pub mod driver;
pub mod report;

#[cfg(test)]
pub(crate) mod fakes;

use std::io::Write;
use std::path::PathBuf;

use crate::error::InitError;
use crate::model::config::{ConfigLoader, FileConfigLoader};
use crate::plugin::installer::{MirrorInstaller, PluginInstaller};
use crate::plugin::locator::{FsLocator, PluginLocator};
use crate::workdir;

pub use context::{ChangedDir, ProcessDir, WorkingContext};
pub use driver::{InstallDecision, classify};
pub use report::Report;

pub const BANNER: &str = "Installing plugins on each working directory...";
pub const ALL_INSTALLED: &str = "All plugins are already installed";

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    pub recursive: bool,
    pub chdir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// How per-directory progress reaches the user stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// One directory: write progress as it happens.
    Immediate,
    /// Many directories: hold each directory's report back until there is
    /// something worth showing.
    Buffered,
}

impl ReportMode {
    pub fn for_run(recursive: bool) -> Self {
        if recursive {
            ReportMode::Buffered
        } else {
            ReportMode::Immediate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub recursive: bool,
    pub installed: bool,
}

impl RunSummary {
    pub fn new(mode: ReportMode) -> Self {
        Self {
            recursive: mode == ReportMode::Buffered,
            installed: false,
        }
    }

    pub fn closing_line(&self) -> Option<&'static str> {
        (self.recursive && !self.installed).then_some(ALL_INSTALLED)
    }
}

/// The collaborators one `init` run talks to.
pub struct Provisioner<'a> {
    loader: &'a dyn ConfigLoader,
    locator: &'a dyn PluginLocator,
    installer: &'a dyn PluginInstaller,
    context: &'a dyn WorkingContext,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        loader: &'a dyn ConfigLoader,
        locator: &'a dyn PluginLocator,
        installer: &'a dyn PluginInstaller,
    ) -> Self {
        Self {
            loader,
            locator,
            installer,
            context: &ProcessDir,
        }
    }

    pub fn with_context(mut self, context: &'a dyn WorkingContext) -> Self {
        self.context = context;
        self
    }

    pub fn run(
        &self,
        dirs: &[PathBuf],
        mode: ReportMode,
        out: &mut dyn Write,
    ) -> Result<RunSummary, InitError> {
        let mut summary = RunSummary::new(mode);

        if mode == ReportMode::Buffered {
            writeln!(out, "{BANNER}")?;
            writeln!(out)?;
        }

        for dir in dirs {
            tracing::debug!("processing {}", dir.display());
            self.context.within(dir, &mut || {
                self.install_in_dir(dir, mode, &mut *out, &mut summary)
            })?;
        }

        if let Some(line) = summary.closing_line() {
            writeln!(out, "{line}")?;
        }

        Ok(summary)
    }
}

/// Resolve working directories and install into each with the filesystem
/// backed collaborators.
pub fn run_init(options: &InitOptions, out: &mut dyn Write) -> Result<RunSummary, InitError> {
    let loader = FileConfigLoader::new(options.config.clone());
    let dirs = workdir::find_working_dirs(options, &loader.marker())?;
    tracing::debug!("working directories: {dirs:?}");

    Provisioner::new(&loader, &FsLocator, &MirrorInstaller).run(
        &dirs,
        ReportMode::for_run(options.recursive),
        out,
    )
}
