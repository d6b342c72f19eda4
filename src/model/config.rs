use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in every working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".lintplug.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: plugin \"{name}\" is declared more than once", path.display())]
    DuplicatePlugin { path: PathBuf, name: String },

    #[error("{}: plugin #{index} has an empty name", path.display())]
    MissingName { path: PathBuf, index: usize },

    #[error("{}: plugin name \"{name}\" must not contain path separators", path.display())]
    InvalidName { path: PathBuf, name: String },

    #[error("{}: plugin \"{name}\" has an invalid source \"{source_ref}\"", path.display())]
    InvalidSource {
        path: PathBuf,
        name: String,
        source_ref: String,
    },

    #[error("{}: plugin \"{name}\" has an invalid version \"{version}\"", path.display())]
    InvalidVersion {
        path: PathBuf,
        name: String,
        version: String,
        #[source]
        source: semver::Error,
    },
}

/// Loaded `.lintplug.toml` for one working directory.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub config: GeneralConfig,
    #[serde(default, rename = "plugin")]
    pub plugins: Vec<PluginConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub plugin_dir: Option<PathBuf>,
    #[serde(default)]
    pub release_mirror: Option<PathBuf>,
}

/// One `[[plugin]]` entry. A plugin without `source` or `version` is
/// managed by hand and never installed by `init`.
///
/// `enabled` only matters when linting; `init` installs disabled plugins too.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub signing_key: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            enabled: default_enabled(),
            source: None,
            version: None,
            signing_key: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl PluginConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_release(mut self, source: impl Into<String>, version: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self.version = Some(version.into());
        self
    }

    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(key.into());
        self
    }
}

/// Loads the configuration of the current working directory.
pub trait ConfigLoader {
    fn load(&self) -> Result<LintConfig, ConfigError>;
}

/// Reads `.lintplug.toml`, or the `--config` override, relative to the
/// current directory.
#[derive(Debug, Default, Clone)]
pub struct FileConfigLoader {
    override_path: Option<PathBuf>,
}

impl FileConfigLoader {
    pub fn new(override_path: Option<PathBuf>) -> Self {
        Self { override_path }
    }

    /// Path, relative to a candidate directory, whose presence makes it a
    /// working directory in recursive mode. An absolute override is read as
    /// is from every directory, so those directories are still found by the
    /// default file.
    pub fn marker(&self) -> PathBuf {
        self.override_path
            .as_deref()
            .filter(|path| path.is_relative())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(&self) -> Result<LintConfig, ConfigError> {
        LintConfig::load(self.override_path.as_deref())
    }
}

impl LintConfig {
    /// Load with an optional override. The default file may be absent, in
    /// which case no plugins are declared; an explicit override must exist.
    pub fn load(override_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = override_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound && override_path.is_none() => {
                tracing::debug!("{} not found, using empty config", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&raw, path)
    }

    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: LintConfig = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate(path)?;

        // Expand ~ in path settings
        config.config.plugin_dir = config.config.plugin_dir.as_deref().map(expand_tilde);
        config.config.release_mirror = config.config.release_mirror.as_deref().map(expand_tilde);

        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, plugin) in self.plugins.iter().enumerate() {
            if plugin.name.trim().is_empty() {
                return Err(ConfigError::MissingName {
                    path: path.to_path_buf(),
                    index,
                });
            }
            if plugin.name.contains(['/', '\\']) || plugin.name == "." || plugin.name == ".." {
                return Err(ConfigError::InvalidName {
                    path: path.to_path_buf(),
                    name: plugin.name.clone(),
                });
            }
            if !seen.insert(plugin.name.as_str()) {
                return Err(ConfigError::DuplicatePlugin {
                    path: path.to_path_buf(),
                    name: plugin.name.clone(),
                });
            }

            // Source and version become directories under the plugin dir
            if let Some(source) = plugin.source.as_deref().filter(|s| !s.is_empty()) {
                if !is_safe_source(source) {
                    return Err(ConfigError::InvalidSource {
                        path: path.to_path_buf(),
                        name: plugin.name.clone(),
                        source_ref: source.to_string(),
                    });
                }
            }
            if let Some(version) = plugin.version.as_deref().filter(|v| !v.is_empty()) {
                semver::Version::parse(version).map_err(|source| ConfigError::InvalidVersion {
                    path: path.to_path_buf(),
                    name: plugin.name.clone(),
                    version: version.to_string(),
                    source,
                })?;
            }
        }
        Ok(())
    }
}

/// Every `/`-separated segment is a plain, non-empty directory name.
pub(crate) fn is_safe_source(source: &str) -> bool {
    !source.contains('\\')
        && source.split('/').all(|segment| {
            !segment.trim().is_empty() && segment != "." && segment != ".."
        })
}

pub(crate) fn expand_tilde(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if !text.starts_with('~') {
        return path.to_path_buf();
    }

    if let Some(home) = dirs_home() {
        return PathBuf::from(text.replacen('~', &home.to_string_lossy(), 1));
    }

    path.to_path_buf()
}

pub(crate) fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}
