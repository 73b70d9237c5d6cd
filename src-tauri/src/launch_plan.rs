use std::{
    env,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{backend_path::BackendLocation, env_loader::EnvEntries, logging};

const BACKEND_ARGS_ENV: &str = "SONDACLICK_BACKEND_ARGS";

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Everything needed to spawn the worker, minus the resolved executable.
#[derive(Debug, Clone)]
pub(crate) struct LaunchPlan {
    pub(crate) location: BackendLocation,
    pub(crate) args: Vec<String>,
    pub(crate) env: EnvEntries,
    pub(crate) log_path: Option<PathBuf>,
}

pub(crate) fn backend_args_from_env() -> Result<Vec<String>, String> {
    let Ok(raw) = env::var(BACKEND_ARGS_ENV) else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    shlex::split(&raw).ok_or_else(|| format!("Invalid {BACKEND_ARGS_ENV}: {raw}"))
}

pub(crate) fn working_dir_for(executable: &Path) -> PathBuf {
    executable
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl LaunchPlan {
    /// Builds the spawn command. The child inherits the process environment
    /// with the loaded entries layered on top; nothing goes through a shell.
    pub(crate) fn build_command(&self, executable: &Path) -> Command {
        let mut command = Command::new(executable);
        command
            .args(&self.args)
            .current_dir(working_dir_for(executable))
            .envs(&self.env)
            .stdin(Stdio::null());

        match self.log_path.as_deref().map(logging::open_append_log) {
            Some(Ok(stdout_file)) => match stdout_file.try_clone() {
                Ok(stderr_file) => {
                    command.stdout(Stdio::from(stdout_file));
                    command.stderr(Stdio::from(stderr_file));
                }
                Err(error) => {
                    tracing::warn!("failed to clone backend log handle: {error}");
                    command.stdout(Stdio::from(stdout_file));
                    command.stderr(Stdio::null());
                }
            },
            Some(Err(error)) => {
                tracing::warn!("failed to open backend log: {error}; discarding worker output");
                command.stdout(Stdio::null());
                command.stderr(Stdio::null());
            }
            None => {
                command.stdout(Stdio::null());
                command.stderr(Stdio::null());
            }
        }

        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        command
    }

    pub(crate) fn debug_command(&self, executable: &Path) -> Vec<String> {
        let mut parts = vec![executable.display().to_string()];
        parts.extend(self.args.clone());
        parts
    }
}
