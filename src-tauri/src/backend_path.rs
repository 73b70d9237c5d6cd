use std::{
    env,
    path::{Path, PathBuf},
};

use tauri::AppHandle;

use crate::{
    runtime_paths, worker_state::SupervisorError, BACKEND_EXECUTABLE_STEM, PACKAGED_BACKEND_DIR,
};

const BACKEND_PATH_ENV: &str = "SONDACLICK_BACKEND_PATH";

/// Where the worker executable may live. `packaged` selects which candidate
/// is tried first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BackendLocation {
    pub(crate) dev_path: PathBuf,
    pub(crate) packaged_path: Option<PathBuf>,
    pub(crate) override_path: Option<PathBuf>,
    pub(crate) packaged: bool,
}

pub(crate) fn executable_file_name() -> String {
    if cfg!(target_os = "windows") {
        format!("{BACKEND_EXECUTABLE_STEM}.exe")
    } else {
        BACKEND_EXECUTABLE_STEM.to_string()
    }
}

pub(crate) fn dev_backend_path(workspace_root: &Path) -> PathBuf {
    workspace_root
        .join("backend")
        .join("dist")
        .join(BACKEND_EXECUTABLE_STEM)
        .join(executable_file_name())
}

pub(crate) fn backend_path_override() -> Option<PathBuf> {
    env::var(BACKEND_PATH_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

impl BackendLocation {
    pub(crate) fn for_app(app: &AppHandle, packaged: bool) -> Self {
        Self {
            dev_path: dev_backend_path(&runtime_paths::workspace_root_dir()),
            packaged_path: runtime_paths::resolve_resource_path(
                app,
                &format!("{PACKAGED_BACKEND_DIR}/{}", executable_file_name()),
            ),
            override_path: backend_path_override(),
            packaged,
        }
    }

    pub(crate) fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.override_path {
            return vec![path.clone()];
        }

        let mut candidates = Vec::with_capacity(2);
        let packaged = self.packaged_path.iter().cloned();
        if self.packaged {
            candidates.extend(packaged);
            candidates.push(self.dev_path.clone());
        } else {
            candidates.push(self.dev_path.clone());
            candidates.extend(packaged);
        }
        candidates
    }

    pub(crate) fn resolve(&self) -> Result<PathBuf, SupervisorError> {
        let candidates = self.candidates();
        candidates
            .iter()
            .find(|candidate| candidate.is_file())
            .cloned()
            .ok_or(SupervisorError::ExecutableNotFound { candidates })
    }
}
