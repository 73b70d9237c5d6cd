use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use tauri::menu::MenuItem;

use crate::{backend_supervisor::DesktopSupervisor, exit_state, worker_state::WorkerState};

#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) toggle_item: MenuItem<tauri::Wry>,
    pub(crate) quit_item: MenuItem<tauri::Wry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BackendBridgeState {
    pub(crate) state: WorkerState,
    pub(crate) running: bool,
    pub(crate) retry_count: u32,
    pub(crate) last_exit_code: Option<i32>,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BackendBridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub(crate) struct NotificationRequest {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) body: String,
}

/// Process-wide state shared by the lifecycle handlers. Built once in setup
/// and handed to Tauri as managed state.
pub(crate) struct AppContext {
    quitting: AtomicBool,
    recovering: AtomicBool,
    ui_ready: AtomicBool,
    exit_state: Mutex<exit_state::ExitStateMachine>,
    supervisor: Arc<DesktopSupervisor>,
}

impl AppContext {
    pub(crate) fn new(supervisor: Arc<DesktopSupervisor>) -> Self {
        Self {
            quitting: AtomicBool::new(false),
            recovering: AtomicBool::new(false),
            ui_ready: AtomicBool::new(false),
            exit_state: Mutex::new(exit_state::ExitStateMachine::default()),
            supervisor,
        }
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::Acquire)
    }

    /// One-way: once set the flag stays set for the rest of the process.
    pub(crate) fn mark_quitting(&self) {
        self.quitting.store(true, Ordering::Release);
    }

    /// Set once the window and tray exist after the first successful start.
    pub(crate) fn mark_ui_ready(&self) {
        self.ui_ready.store(true, Ordering::Release);
    }

    pub(crate) fn is_ui_ready(&self) -> bool {
        self.ui_ready.load(Ordering::Acquire)
    }

    pub(crate) fn supervisor(&self) -> &Arc<DesktopSupervisor> {
        &self.supervisor
    }

    pub(crate) fn exit_state(&self) -> MutexGuard<'_, exit_state::ExitStateMachine> {
        self.exit_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn try_begin_recovery(&self) -> Option<AtomicFlagGuard<'_>> {
        AtomicFlagGuard::try_set(&self.recovering)
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
