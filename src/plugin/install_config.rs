use std::env;
use std::path::{Path, PathBuf};

use crate::model::config::{LintConfig, PluginConfig, dirs_home, expand_tilde};

/// Prefix of every installed rule set binary.
pub const PLUGIN_BINARY_PREFIX: &str = "lintplug-ruleset-";

pub const PLUGIN_DIR_ENV: &str = "LINTPLUG_PLUGIN_DIR";
pub const RELEASE_MIRROR_ENV: &str = "LINTPLUG_RELEASE_MIRROR";

const LOCAL_PLUGIN_DIR: &str = ".lintplug.d/plugins";

/// Everything needed to locate or install one declared plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    pub name: String,
    pub source: String,
    pub version: String,
    pub signing_key: Option<String>,
    pub plugin_dir: PathBuf,
    pub release_mirror: Option<PathBuf>,
}

impl InstallConfig {
    pub fn new(config: &LintConfig, plugin: &PluginConfig) -> Self {
        Self {
            name: plugin.name.clone(),
            source: plugin.source.clone().unwrap_or_default(),
            version: plugin.version.clone().unwrap_or_default(),
            signing_key: plugin.signing_key.clone().filter(|key| !key.trim().is_empty()),
            plugin_dir: resolve_plugin_dir(config),
            release_mirror: resolve_release_mirror(config),
        }
    }

    /// Without both a source and a version the plugin has to be put in
    /// place by hand.
    pub fn is_manually_managed(&self) -> bool {
        self.source.is_empty() || self.version.is_empty()
    }

    pub fn tag_name(&self) -> String {
        format!("v{}", self.version)
    }

    pub fn binary_name(&self) -> String {
        format!("{PLUGIN_BINARY_PREFIX}{}{}", self.name, env::consts::EXE_SUFFIX)
    }

    /// `<plugin_dir>/<source>/<version>/lintplug-ruleset-<name>`
    pub fn install_path(&self) -> PathBuf {
        let mut path = self.plugin_dir.clone();
        path.extend(source_segments(&self.source));
        path.push(&self.version);
        path.push(self.binary_name());
        path
    }
}

fn source_segments(source: &str) -> impl Iterator<Item = &str> {
    source.split('/').filter(|segment| !segment.is_empty())
}

fn resolve_plugin_dir(config: &LintConfig) -> PathBuf {
    if let Some(dir) = config.config.plugin_dir.as_ref() {
        return dir.clone();
    }

    if let Some(dir) = env::var_os(PLUGIN_DIR_ENV).filter(|v| !v.is_empty()) {
        return expand_tilde(Path::new(&dir));
    }

    let local = PathBuf::from(LOCAL_PLUGIN_DIR);
    if local.is_dir() {
        return local;
    }

    default_plugin_base_dir()
}

fn default_plugin_base_dir() -> PathBuf {
    if let Some(home) = dirs_home() {
        return home.join(LOCAL_PLUGIN_DIR);
    }

    PathBuf::from(LOCAL_PLUGIN_DIR)
}

fn resolve_release_mirror(config: &LintConfig) -> Option<PathBuf> {
    config.config.release_mirror.clone().or_else(|| {
        env::var_os(RELEASE_MIRROR_ENV)
            .filter(|v| !v.is_empty())
            .map(|dir| expand_tilde(Path::new(&dir)))
    })
}
