#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitPhase {
    Running,
    CleaningUp,
    ReadyToExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitRequestDecision {
    /// Last window went away without a quit: keep living in the tray.
    PersistInTray,
    /// First quit request: prevent the exit and run cleanup once.
    StartCleanup,
    /// Cleanup already running; keep preventing.
    WaitForCleanup,
    AllowExit,
}

#[derive(Debug)]
pub(crate) struct ExitStateMachine {
    phase: ExitPhase,
    exit_code: i32,
}

impl Default for ExitStateMachine {
    fn default() -> Self {
        Self {
            phase: ExitPhase::Running,
            exit_code: 0,
        }
    }
}

impl ExitStateMachine {
    pub(crate) fn on_exit_requested(
        &mut self,
        code: Option<i32>,
        quitting: bool,
    ) -> ExitRequestDecision {
        match self.phase {
            ExitPhase::Running if code.is_none() && !quitting => ExitRequestDecision::PersistInTray,
            ExitPhase::Running => {
                self.phase = ExitPhase::CleaningUp;
                self.exit_code = code.unwrap_or(0);
                ExitRequestDecision::StartCleanup
            }
            ExitPhase::CleaningUp => ExitRequestDecision::WaitForCleanup,
            ExitPhase::ReadyToExit => ExitRequestDecision::AllowExit,
        }
    }

    /// Returns the exit code recorded by the first quit request.
    pub(crate) fn mark_cleanup_finished(&mut self) -> i32 {
        self.phase = ExitPhase::ReadyToExit;
        self.exit_code
    }
}
