use std::env;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "LINTPLUG_LOG";
pub const LOG_DIR_ENV: &str = "LINTPLUG_LOG_DIR";

fn default_filter(verbose: bool) -> &'static str {
    if verbose { "lintplug=debug" } else { "lintplug=warn" }
}

/// Initialize logging. Stdout carries the user-facing report, so logs go to
/// stderr, or to a daily rolling file under `LINTPLUG_LOG_DIR` when set.
/// Keep the returned guard alive until exit so buffered lines get written.
pub fn init(verbose: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match env::var(LOG_FILTER_ENV) {
        Ok(spec) if !spec.trim().is_empty() => EnvFilter::try_new(spec)?,
        _ => EnvFilter::new(default_filter(verbose)),
    };

    match env::var_os(LOG_DIR_ENV).filter(|dir| !dir.is_empty()) {
        Some(dir) => {
            let log_dir = PathBuf::from(dir);
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = tracing_appender::rolling::daily(&log_dir, "lintplug.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
            Ok(None)
        }
    }
}
