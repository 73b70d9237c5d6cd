use std::path::{Path, PathBuf};

use tauri::{path::BaseDirectory, AppHandle, Manager};

pub(crate) fn default_packaged_root_dir() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".sondaclick"))
}

pub(crate) fn logs_dir(root_dir: Option<&Path>) -> Option<PathBuf> {
    root_dir.map(|root| root.join("logs"))
}

/// Repository root in development builds; `src-tauri` sits one level below it.
pub(crate) fn workspace_root_dir() -> PathBuf {
    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
    candidate.canonicalize().unwrap_or(candidate)
}

pub(crate) fn resolve_resource_path(app: &AppHandle, relative_path: &str) -> Option<PathBuf> {
    app.path()
        .resolve(relative_path, BaseDirectory::Resource)
        .ok()
}
