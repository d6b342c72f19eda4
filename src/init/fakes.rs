//! In-memory collaborators for driving `init` without touching the disk.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::InitError;
use crate::init::{Provisioner, WorkingContext};
use crate::model::config::{ConfigError, ConfigLoader, LintConfig, PluginConfig};
use crate::plugin::install_config::InstallConfig;
use crate::plugin::installer::{InstallError, PluginInstaller};
use crate::plugin::locator::{LookupError, PluginLocator};

pub(crate) fn plugin_dir_config() -> LintConfig {
    let mut config = LintConfig::default();
    config.config.plugin_dir = Some(PathBuf::from("/plugins"));
    config
}

#[derive(Default)]
pub(crate) struct FakeWorld {
    current: RefCell<Option<PathBuf>>,
    configs: RefCell<HashMap<PathBuf, Option<LintConfig>>>,
    installed: RefCell<HashSet<String>>,
    broken_lookups: RefCell<HashSet<String>>,
    failing_installs: RefCell<HashSet<String>>,
    entered: RefCell<Vec<PathBuf>>,
    install_calls: RefCell<Vec<String>>,
}

impl FakeWorld {
    pub(crate) fn new() -> Self {
        colored::control::set_override(false);
        Self::default()
    }

    pub(crate) fn provisioner(&self) -> Provisioner<'_> {
        Provisioner::new(self, self, self).with_context(self)
    }

    pub(crate) fn set_config(&self, dir: &str, plugins: Vec<PluginConfig>) {
        let mut config = plugin_dir_config();
        config.plugins = plugins;
        self.configs.borrow_mut().insert(PathBuf::from(dir), Some(config));
    }

    pub(crate) fn break_config(&self, dir: &str) {
        self.configs.borrow_mut().insert(PathBuf::from(dir), None);
    }

    pub(crate) fn mark_installed(&self, name: &str) {
        self.installed.borrow_mut().insert(name.to_string());
    }

    pub(crate) fn break_lookup(&self, name: &str) {
        self.broken_lookups.borrow_mut().insert(name.to_string());
    }

    pub(crate) fn fail_install(&self, name: &str) {
        self.failing_installs.borrow_mut().insert(name.to_string());
    }

    pub(crate) fn entered(&self) -> Vec<PathBuf> {
        self.entered.borrow().clone()
    }

    pub(crate) fn install_calls(&self) -> Vec<String> {
        self.install_calls.borrow().clone()
    }

    /// Run `f` with `dir` current, like [`WorkingContext::within`].
    pub(crate) fn enter<R>(&self, dir: &Path, f: impl FnOnce() -> R) -> R {
        let previous = self.current.replace(Some(dir.to_path_buf()));
        self.entered.borrow_mut().push(dir.to_path_buf());
        let result = f();
        *self.current.borrow_mut() = previous;
        result
    }
}

impl WorkingContext for FakeWorld {
    fn within(
        &self,
        dir: &Path,
        f: &mut dyn FnMut() -> Result<(), InitError>,
    ) -> Result<(), InitError> {
        self.enter(dir, f)
    }
}

impl ConfigLoader for FakeWorld {
    fn load(&self) -> Result<LintConfig, ConfigError> {
        let current = self.current.borrow().clone().unwrap_or_default();
        match self.configs.borrow().get(&current) {
            Some(Some(config)) => Ok(config.clone()),
            Some(None) => Err(ConfigError::DuplicatePlugin {
                path: current.join(".lintplug.toml"),
                name: "aws".to_string(),
            }),
            None => Ok(plugin_dir_config()),
        }
    }
}

impl PluginLocator for FakeWorld {
    fn find(&self, install: &InstallConfig) -> Result<PathBuf, LookupError> {
        let path = install.install_path();
        if self.broken_lookups.borrow().contains(&install.name) {
            return Err(LookupError::Io {
                path,
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        if self.installed.borrow().contains(&install.name) {
            Ok(path)
        } else {
            Err(LookupError::NotFound { path })
        }
    }
}

impl PluginInstaller for FakeWorld {
    fn install(&self, install: &InstallConfig) -> Result<PathBuf, InstallError> {
        self.install_calls.borrow_mut().push(install.name.clone());
        if self.failing_installs.borrow().contains(&install.name) {
            return Err(InstallError::NoMirror);
        }
        self.mark_installed(&install.name);
        Ok(install.install_path())
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Collect everything logged at debug level or above while `f` runs.
pub(crate) fn capture_debug(f: impl FnOnce()) -> String {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buf.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
