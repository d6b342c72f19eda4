use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::InitError;
use crate::init::InitOptions;

/// Directories `init` should process, in processing order.
///
/// Without `--recursive` this is just the `--chdir` target (or `.`). With it,
/// every directory under `.` holding a config file, parents first.
pub fn find_working_dirs(options: &InitOptions, marker: &Path) -> Result<Vec<PathBuf>, InitError> {
    if !options.recursive {
        let dir = options.chdir.clone().unwrap_or_else(|| PathBuf::from("."));
        return Ok(vec![dir]);
    }

    walk_config_dirs(Path::new("."), marker).map_err(InitError::FindWorkingDirs)
}

pub fn walk_config_dirs(root: &Path, marker: &Path) -> io::Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(root)
        .hidden(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| entry.file_type().is_some_and(|ft| ft.is_dir()))
        .build();

    let mut dirs = Vec::new();
    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.path().join(marker).is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if relative.as_os_str().is_empty() {
            dirs.push(PathBuf::from("."));
        } else {
            dirs.push(relative.to_path_buf());
        }
    }

    Ok(dirs)
}
