use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) enum WorkerState {
    NotStarted,
    Starting,
    Ready,
    Failed,
    Terminating,
    Terminated,
}

#[derive(Debug, Error)]
pub(crate) enum SupervisorError {
    #[error("backend executable not found (looked in: {})", display_paths(.candidates))]
    ExecutableNotFound { candidates: Vec<PathBuf> },
    #[error("failed to spawn backend {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("backend did not answer its health check after {attempts} attempts")]
    StartupTimeout { attempts: u32 },
    #[error("backend exited before becoming reachable (exit code {code:?})")]
    WorkerExited { code: Option<i32> },
    #[error("backend is busy ({0:?}); start request rejected")]
    Busy(WorkerState),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartDecision {
    Launch,
    AlreadyReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitKind {
    /// Exited while a start was in flight; the start reports the failure.
    DuringStartup,
    /// Exited because we asked it to, or with code 0.
    Expected,
    Unexpected,
}

/// Lifecycle of the supervised worker, independent of how it is spawned.
#[derive(Debug)]
pub(crate) struct WorkerLifecycle {
    state: WorkerState,
    retry_count: u32,
    last_exit_code: Option<i32>,
}

impl Default for WorkerLifecycle {
    fn default() -> Self {
        Self {
            state: WorkerState::NotStarted,
            retry_count: 0,
            last_exit_code: None,
        }
    }
}

impl WorkerLifecycle {
    pub(crate) fn state(&self) -> WorkerState {
        self.state
    }

    pub(crate) fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub(crate) fn last_exit_code(&self) -> Option<i32> {
        self.last_exit_code
    }

    pub(crate) fn begin_start(&mut self, handle_alive: bool) -> Result<StartDecision, SupervisorError> {
        match self.state {
            WorkerState::Starting | WorkerState::Terminating => {
                Err(SupervisorError::Busy(self.state))
            }
            WorkerState::Ready if handle_alive => Ok(StartDecision::AlreadyReady),
            _ => {
                self.state = WorkerState::Starting;
                self.retry_count = 0;
                Ok(StartDecision::Launch)
            }
        }
    }

    pub(crate) fn record_failed_probe(&mut self) -> u32 {
        self.retry_count += 1;
        self.retry_count
    }

    pub(crate) fn mark_ready(&mut self) {
        if self.state == WorkerState::Starting {
            self.state = WorkerState::Ready;
        }
    }

    pub(crate) fn mark_failed(&mut self) {
        if self.state == WorkerState::Starting {
            self.state = WorkerState::Failed;
        }
    }

    /// Returns false when a termination is already under way.
    pub(crate) fn begin_terminate(&mut self) -> bool {
        if self.state == WorkerState::Terminating {
            return false;
        }
        self.state = WorkerState::Terminating;
        true
    }

    pub(crate) fn mark_terminated(&mut self, exit_code: Option<i32>) {
        self.state = WorkerState::Terminated;
        if exit_code.is_some() {
            self.last_exit_code = exit_code;
        }
    }

    /// Records an exit observed by the watcher and classifies it.
    pub(crate) fn observe_exit(&mut self, exit_code: Option<i32>) -> ExitKind {
        self.last_exit_code = exit_code;
        match self.state {
            WorkerState::Starting => {
                self.state = WorkerState::Failed;
                ExitKind::DuringStartup
            }
            // A worker left behind by a timed-out start never became Ready.
            WorkerState::Failed => ExitKind::DuringStartup,
            WorkerState::Terminating => {
                self.state = WorkerState::Terminated;
                ExitKind::Expected
            }
            _ => {
                self.state = WorkerState::Terminated;
                if exit_code == Some(0) {
                    ExitKind::Expected
                } else {
                    ExitKind::Unexpected
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_start_rejects_while_starting_or_terminating() {
        let mut lifecycle = WorkerLifecycle::default();
        assert_eq!(lifecycle.begin_start(false).unwrap(), StartDecision::Launch);
        assert!(matches!(
            lifecycle.begin_start(true),
            Err(SupervisorError::Busy(WorkerState::Starting))
        ));

        lifecycle.mark_ready();
        assert!(lifecycle.begin_terminate());
        assert!(matches!(
            lifecycle.begin_start(true),
            Err(SupervisorError::Busy(WorkerState::Terminating))
        ));
    }

    #[test]
    fn begin_start_is_noop_when_ready_with_live_handle() {
        let mut lifecycle = WorkerLifecycle::default();
        lifecycle.begin_start(false).unwrap();
        lifecycle.mark_ready();
        assert_eq!(lifecycle.begin_start(true).unwrap(), StartDecision::AlreadyReady);
        assert_eq!(lifecycle.begin_start(false).unwrap(), StartDecision::Launch);
    }

    #[test]
    fn begin_start_resets_retry_count_after_failure() {
        let mut lifecycle = WorkerLifecycle::default();
        lifecycle.begin_start(false).unwrap();
        lifecycle.record_failed_probe();
        lifecycle.record_failed_probe();
        lifecycle.mark_failed();
        assert_eq!(lifecycle.state(), WorkerState::Failed);
        assert_eq!(lifecycle.retry_count(), 2);

        lifecycle.begin_start(false).unwrap();
        assert_eq!(lifecycle.retry_count(), 0);
    }

    #[test]
    fn observe_exit_classifies_by_state_and_code() {
        let mut lifecycle = WorkerLifecycle::default();
        lifecycle.begin_start(false).unwrap();
        assert_eq!(lifecycle.observe_exit(Some(1)), ExitKind::DuringStartup);
        assert_eq!(lifecycle.state(), WorkerState::Failed);

        lifecycle.begin_start(false).unwrap();
        lifecycle.mark_ready();
        assert_eq!(lifecycle.observe_exit(Some(3)), ExitKind::Unexpected);
        assert_eq!(lifecycle.state(), WorkerState::Terminated);
        assert_eq!(lifecycle.last_exit_code(), Some(3));

        lifecycle.begin_start(false).unwrap();
        lifecycle.mark_ready();
        assert_eq!(lifecycle.observe_exit(Some(0)), ExitKind::Expected);

        lifecycle.begin_start(false).unwrap();
        lifecycle.mark_ready();
        lifecycle.begin_terminate();
        assert_eq!(lifecycle.observe_exit(Some(1)), ExitKind::Expected);
    }

    #[test]
    fn observe_exit_after_failed_start_is_not_unexpected() {
        let mut lifecycle = WorkerLifecycle::default();
        lifecycle.begin_start(false).unwrap();
        lifecycle.mark_failed();

        assert_eq!(lifecycle.observe_exit(Some(1)), ExitKind::DuringStartup);
        assert_eq!(lifecycle.state(), WorkerState::Failed);
        assert_eq!(lifecycle.last_exit_code(), Some(1));
    }

    #[test]
    fn begin_terminate_refuses_second_termination() {
        let mut lifecycle = WorkerLifecycle::default();
        assert!(lifecycle.begin_terminate());
        assert!(!lifecycle.begin_terminate());
        lifecycle.mark_terminated(None);
        assert_eq!(lifecycle.state(), WorkerState::Terminated);
    }
}
