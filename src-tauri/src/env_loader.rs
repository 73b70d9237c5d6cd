use std::{
    collections::BTreeMap,
    env,
    path::{Path, PathBuf},
};

use tauri::AppHandle;

use crate::{
    append_startup_log, runtime_paths, ENV_FILE_ENV, ENV_FILE_NAME, ENV_OVERRIDE_ENV,
    PACKAGED_ENV_DIR,
};

/// Key/value pairs read from the `.env` file, in key order.
pub(crate) type EnvEntries = BTreeMap<String, String>;

pub(crate) fn resolve_env_file_path(app: &AppHandle, packaged_mode: bool) -> Option<PathBuf> {
    if let Some(path) = env::var(ENV_FILE_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        return Some(PathBuf::from(path));
    }

    if packaged_mode {
        runtime_paths::resolve_resource_path(app, &format!("{PACKAGED_ENV_DIR}/{ENV_FILE_NAME}"))
    } else {
        Some(runtime_paths::workspace_root_dir().join(ENV_FILE_NAME))
    }
}

pub(crate) fn override_requested() -> bool {
    env::var(ENV_OVERRIDE_ENV)
        .map(|value| matches!(value.trim(), "1" | "true" | "TRUE" | "yes"))
        .unwrap_or(false)
}

/// Parses `path` as a dotenv file. A missing file yields an empty mapping; a
/// malformed line stops parsing and keeps what was read before it.
pub(crate) fn read_env_entries(path: &Path) -> EnvEntries {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(dotenvy::Error::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                "env file {} not found; relying on process environment",
                path.display()
            );
            return EnvEntries::new();
        }
        Err(error) => {
            tracing::warn!("failed to open env file {}: {error}", path.display());
            return EnvEntries::new();
        }
    };

    let mut entries = EnvEntries::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                entries.insert(key, value);
            }
            Err(error) => {
                tracing::warn!(
                    "stopped reading env file {} at malformed entry: {error}",
                    path.display()
                );
                break;
            }
        }
    }
    entries
}

/// Copies entries into the process environment. Existing keys are kept
/// unless `override_existing` is set. Returns the number of keys written.
pub(crate) fn apply_to_process(entries: &EnvEntries, override_existing: bool) -> usize {
    let mut applied = 0;
    for (key, value) in entries {
        if !override_existing && env::var_os(key).is_some() {
            continue;
        }
        env::set_var(key, value);
        applied += 1;
    }
    applied
}

pub(crate) fn load(path: &Path, override_existing: bool) -> EnvEntries {
    let entries = read_env_entries(path);
    let applied = apply_to_process(&entries, override_existing);
    append_startup_log(&format!(
        "loaded {} env entries from {} ({} applied to process environment)",
        entries.len(),
        path.display(),
        applied
    ));
    entries
}
