use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::{
    fmt::{time::ChronoLocal, writer::MakeWriterExt},
    EnvFilter,
};

use crate::{runtime_paths, DESKTOP_LOG_FILE, LOG_FILTER_ENV};

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    runtime_paths::logs_dir(root_dir.as_deref())
        .unwrap_or_else(std::env::temp_dir)
        .join(file_name)
}

pub(crate) fn open_append_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn resolve_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Writes to stderr, and to the desktop log
/// file when it can be opened.
pub(crate) fn init_logging() {
    let log_path =
        resolve_desktop_log_path(runtime_paths::default_packaged_root_dir(), DESKTOP_LOG_FILE);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter())
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
        .with_ansi(false);

    let installed = match open_append_log(&log_path) {
        Ok(file) => builder
            .with_writer(std::io::stderr.and(Mutex::new(file)))
            .try_init(),
        Err(error) => {
            eprintln!(
                "failed to open desktop log {}: {error}; logging to stderr only",
                log_path.display()
            );
            builder.with_writer(std::io::stderr).try_init()
        }
    };
    if installed.is_ok() {
        append_startup_log(&format!("desktop log path: {}", log_path.display()));
    }
}

pub(crate) fn append_desktop_log(message: &str) {
    tracing::info!(target: "sondaclick::desktop", "{message}");
}

pub(crate) fn append_startup_log(message: &str) {
    tracing::info!(target: "sondaclick::startup", "{message}");
}

pub(crate) fn append_shutdown_log(message: &str) {
    tracing::info!(target: "sondaclick::shutdown", "{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_desktop_log_path_uses_logs_subdirectory() {
        let root = PathBuf::from("/home/user/.sondaclick");
        assert_eq!(
            resolve_desktop_log_path(Some(root.clone()), "desktop.log"),
            root.join("logs").join("desktop.log")
        );
    }

    #[test]
    fn resolve_desktop_log_path_falls_back_to_temp_dir() {
        assert_eq!(
            resolve_desktop_log_path(None, "desktop.log"),
            std::env::temp_dir().join("desktop.log")
        );
    }

    #[test]
    fn open_append_log_creates_missing_parent_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("logs").join("backend.log");
        open_append_log(&path).expect("log file should open");
        assert!(path.is_file());
    }
}
