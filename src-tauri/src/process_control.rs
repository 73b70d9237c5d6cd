#[cfg(any(target_os = "windows", test))]
use std::process::{Command, Stdio};
use std::{io, path::Path, process::Child};

use crate::{append_shutdown_log, launch_plan::LaunchPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WorkerExit {
    pub(crate) code: Option<i32>,
}

/// A running worker the supervisor exclusively owns.
pub(crate) trait WorkerProcess: Send {
    fn id(&self) -> u32;

    /// Non-blocking: `Ok(None)` while the worker is still running.
    fn poll_exit(&mut self) -> io::Result<Option<WorkerExit>>;

    /// Kills the tracked process and reaps it.
    fn terminate(&mut self) -> io::Result<Option<WorkerExit>>;
}

impl WorkerProcess for Child {
    fn id(&self) -> u32 {
        Child::id(self)
    }

    fn poll_exit(&mut self) -> io::Result<Option<WorkerExit>> {
        Ok(self
            .try_wait()?
            .map(|status| WorkerExit { code: status.code() }))
    }

    fn terminate(&mut self) -> io::Result<Option<WorkerExit>> {
        if let Some(exit) = self.poll_exit()? {
            return Ok(Some(exit));
        }
        self.kill()?;
        let status = self.wait()?;
        Ok(Some(WorkerExit {
            code: status.code(),
        }))
    }
}

pub(crate) trait ProcessLauncher: Send + Sync + 'static {
    fn launch(&self, plan: &LaunchPlan, executable: &Path) -> io::Result<Box<dyn WorkerProcess>>;

    /// Last-resort termination once the graceful request has been tried.
    /// May block on the OS, so callers run it off the async runtime.
    fn force_terminate(
        &self,
        executable_name: &str,
        tracked: Option<Box<dyn WorkerProcess>>,
    ) -> Option<WorkerExit>;
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemProcessLauncher;

impl ProcessLauncher for SystemProcessLauncher {
    fn launch(&self, plan: &LaunchPlan, executable: &Path) -> io::Result<Box<dyn WorkerProcess>> {
        let child = plan.build_command(executable).spawn()?;
        Ok(Box::new(child))
    }

    fn force_terminate(
        &self,
        executable_name: &str,
        tracked: Option<Box<dyn WorkerProcess>>,
    ) -> Option<WorkerExit> {
        #[cfg(target_os = "windows")]
        {
            kill_by_image_name(executable_name);
            // taskkill already signalled the tracked worker; only reap it.
            return tracked.and_then(|mut process| process.poll_exit().ok().flatten());
        }

        #[cfg(not(target_os = "windows"))]
        {
            let _ = executable_name;
            let mut process = tracked?;
            match process.terminate() {
                Ok(exit) => exit,
                Err(error) => {
                    append_shutdown_log(&format!(
                        "failed to kill backend pid {}: {error}",
                        process.id()
                    ));
                    None
                }
            }
        }
    }
}

/// Terminates every process with this image name, including orphans left by
/// earlier sessions.
#[cfg(target_os = "windows")]
fn kill_by_image_name(executable_name: &str) {
    let result = Command::new("taskkill")
        .args(taskkill_args(executable_name))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match result {
        Ok(status) => append_shutdown_log(&format!(
            "taskkill /IM {executable_name} finished with {status}"
        )),
        Err(error) => append_shutdown_log(&format!(
            "failed to run taskkill for {executable_name}: {error}"
        )),
    }
}

#[cfg(any(target_os = "windows", test))]
pub(crate) fn taskkill_args(executable_name: &str) -> [&str; 4] {
    ["/F", "/T", "/IM", executable_name]
}
