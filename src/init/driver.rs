use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::InitError;
use crate::init::report::Report;
use crate::init::{Provisioner, ReportMode, RunSummary};
use crate::plugin::install_config::InstallConfig;
use crate::plugin::locator::{LookupError, PluginLocator};
use crate::plugin::signature::SignatureChecker;

const SEPARATOR: &str = "====================================================";
pub const NO_PLUGINS: &str = "No plugins to install";
pub const NO_SIGNING_KEY: &str = "No signing key configured. Set \"signing_key\" to verify that the release is signed by the plugin developer";

/// What `init` does with one declared plugin.
#[derive(Debug)]
pub enum InstallDecision {
    /// Source or version unset: skipped without a word.
    ManuallyManaged,
    AlreadyInstalled(PathBuf),
    NeedsInstall,
    /// Lookup failed for a reason other than "not found".
    LookupFailed(LookupError),
}

pub fn classify(install: &InstallConfig, locator: &dyn PluginLocator) -> InstallDecision {
    if install.is_manually_managed() {
        return InstallDecision::ManuallyManaged;
    }

    match locator.find(install) {
        Ok(path) => InstallDecision::AlreadyInstalled(path),
        Err(err) if err.is_not_found() => InstallDecision::NeedsInstall,
        Err(err) => InstallDecision::LookupFailed(err),
    }
}

pub fn already_installed_line(name: &str) -> String {
    format!("Plugin \"{name}\" is already installed")
}

/// Lines only worth showing when several directories are processed.
fn hold(report: &mut Report, mode: ReportMode, line: impl Into<String>) {
    match mode {
        ReportMode::Buffered => report.buffer(line),
        ReportMode::Immediate => report.record(line),
    }
}

impl Provisioner<'_> {
    /// Install every missing plugin of the current working directory.
    /// The full narrative always ends up in the debug log.
    pub(super) fn install_in_dir(
        &self,
        dir: &Path,
        mode: ReportMode,
        out: &mut dyn Write,
        summary: &mut RunSummary,
    ) -> Result<(), InitError> {
        let mut report = Report::new();
        let result = self.drive(dir, mode, out, summary, &mut report);
        report.dump_to_log(dir);
        result
    }

    pub(super) fn drive(
        &self,
        dir: &Path,
        mode: ReportMode,
        out: &mut dyn Write,
        summary: &mut RunSummary,
        report: &mut Report,
    ) -> Result<(), InitError> {
        hold(report, mode, SEPARATOR);
        hold(report, mode, format!("working directory: {}", dir.display()));
        hold(report, mode, "");

        let config = match self.loader.load() {
            Ok(config) => config,
            Err(err) => {
                report.flush(out)?;
                return Err(InitError::ConfigLoad(err));
            }
        };

        let mut found = false;
        for plugin in &config.plugins {
            let install = InstallConfig::new(&config, plugin);

            match classify(&install, self.locator) {
                InstallDecision::ManuallyManaged => continue,
                InstallDecision::NeedsInstall => {
                    found = true;
                    self.install_plugin(&install, out, report)?;
                    summary.installed = true;
                }
                InstallDecision::LookupFailed(source) => {
                    report.flush(out)?;
                    return Err(InitError::PluginLookup {
                        name: install.name,
                        source,
                    });
                }
                InstallDecision::AlreadyInstalled(path) => {
                    found = true;
                    tracing::trace!(plugin = %install.name, "found at {}", path.display());
                    let line = already_installed_line(&install.name);
                    match mode {
                        ReportMode::Buffered => report.buffer(line),
                        ReportMode::Immediate => report.write_now(out, line)?,
                    }
                }
            }
        }

        if !found {
            hold(report, mode, NO_PLUGINS);
        }

        Ok(())
    }

    fn install_plugin(
        &self,
        install: &InstallConfig,
        out: &mut dyn Write,
        report: &mut Report,
    ) -> Result<(), InitError> {
        report.write_now(out, format!("Installing \"{}\" plugin...", install.name))?;

        if !SignatureChecker::new(install).has_signing_key() {
            report.warn_now(out, NO_SIGNING_KEY)?;
        }

        self.installer
            .install(install)
            .map_err(|source| InitError::Install {
                name: install.name.clone(),
                source,
            })?;

        report.write_now(
            out,
            format!(
                "Installed \"{}\" (source: {}, version: {})",
                install.name, install.source, install.version
            ),
        )?;
        Ok(())
    }
}
