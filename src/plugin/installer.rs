use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::model::config::is_safe_source;
use crate::plugin::install_config::InstallConfig;

const CHECKSUMS_FILE: &str = "checksums.txt";

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("no release mirror configured; set `release_mirror` or LINTPLUG_RELEASE_MIRROR")]
    NoMirror,

    #[error("source \"{0}\" must be `owner/repo` or `host/owner/repo`")]
    InvalidSource(String),

    #[error("release {tag} of {source_ref} has no artifact at {}", path.display())]
    MissingArtifact {
        source_ref: String,
        tag: String,
        path: PathBuf,
    },

    #[error("{} is not listed in {}", file, checksums.display())]
    ChecksumMissing { file: String, checksums: PathBuf },

    #[error("checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> InstallError + '_ {
    move |source| InstallError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Puts a plugin binary in place so a locator can find it afterwards.
pub trait PluginInstaller {
    fn install(&self, install: &InstallConfig) -> Result<PathBuf, InstallError>;
}

/// Installs releases from a local mirror laid out as
/// `<mirror>/<source>/v<version>/lintplug-ruleset-<name>`, optionally with a
/// `checksums.txt` next to the artifact.
#[derive(Debug, Default, Clone, Copy)]
pub struct MirrorInstaller;

impl PluginInstaller for MirrorInstaller {
    fn install(&self, install: &InstallConfig) -> Result<PathBuf, InstallError> {
        let mirror = install.release_mirror.as_deref().ok_or(InstallError::NoMirror)?;
        validate_source(&install.source)?;

        let release_dir = mirror.join(&install.source).join(install.tag_name());
        let artifact = release_dir.join(install.binary_name());
        if !artifact.is_file() {
            return Err(InstallError::MissingArtifact {
                source_ref: install.source.clone(),
                tag: install.tag_name(),
                path: artifact,
            });
        }

        let bytes = fs::read(&artifact).map_err(io_at(&artifact))?;
        verify_checksum(&release_dir, &install.binary_name(), &bytes)?;

        let dest = install.install_path();
        write_executable(&dest, &bytes)?;

        tracing::info!(
            plugin = %install.name,
            path = %dest.display(),
            "installed plugin from {}",
            release_dir.display()
        );
        Ok(dest)
    }
}

fn validate_source(source: &str) -> Result<(), InstallError> {
    let valid = matches!(source.split('/').count(), 2 | 3) && is_safe_source(source);
    if valid {
        Ok(())
    } else {
        Err(InstallError::InvalidSource(source.to_string()))
    }
}

fn verify_checksum(release_dir: &Path, file: &str, bytes: &[u8]) -> Result<(), InstallError> {
    let checksums = release_dir.join(CHECKSUMS_FILE);
    let listing = match fs::read_to_string(&checksums) {
        Ok(listing) => listing,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no {CHECKSUMS_FILE} in {}, skipping", release_dir.display());
            return Ok(());
        }
        Err(source) => {
            return Err(InstallError::Io {
                path: checksums,
                source,
            });
        }
    };

    let expected = listing
        .lines()
        .filter_map(|line| line.split_once(char::is_whitespace))
        .find(|(_, name)| name.trim().trim_start_matches('*') == file)
        .map(|(digest, _)| digest.to_ascii_lowercase())
        .ok_or_else(|| InstallError::ChecksumMissing {
            file: file.to_string(),
            checksums: checksums.clone(),
        })?;

    let actual = format!("{:x}", Sha256::digest(bytes));
    if actual != expected {
        return Err(InstallError::ChecksumMismatch {
            file: file.to_string(),
            expected,
            actual,
        });
    }

    Ok(())
}

/// Write through a temp file in the target directory so a half written
/// binary is never picked up by the locator.
fn write_executable(dest: &Path, bytes: &[u8]) -> Result<(), InstallError> {
    let parent = dest.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(io_at(parent))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_at(parent))?;
    tmp.write_all(bytes).map_err(io_at(tmp.path()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o755))
            .map_err(io_at(tmp.path()))?;
    }

    tmp.persist(dest).map_err(|err| InstallError::Io {
        path: dest.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}
