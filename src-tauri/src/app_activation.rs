use std::sync::Arc;

use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, append_startup_log, main_window, tray_labels, window_actions,
    worker_state::WorkerState, AppContext, DEFAULT_SHELL_LOCALE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivateDecision {
    Ignore,
    RevealExisting,
    /// The window survived the worker; show it and restart the worker.
    RevealAndRestartBackend,
    RecreateWindow,
    /// The worker is gone; start it again before the window comes back.
    RestartBackend,
}

/// A worker in one of these states has no live process behind it.
pub(crate) fn backend_needs_recovery(backend_state: WorkerState) -> bool {
    matches!(
        backend_state,
        WorkerState::NotStarted | WorkerState::Failed | WorkerState::Terminated
    )
}

pub(crate) fn decide_activate(
    quitting: bool,
    ui_ready: bool,
    window_present: bool,
    backend_state: WorkerState,
) -> ActivateDecision {
    if quitting || !ui_ready {
        return ActivateDecision::Ignore;
    }
    let recover = backend_needs_recovery(backend_state);
    match (window_present, recover) {
        (true, true) => ActivateDecision::RevealAndRestartBackend,
        (true, false) => ActivateDecision::RevealExisting,
        (false, true) => ActivateDecision::RestartBackend,
        (false, false) if backend_state == WorkerState::Ready => ActivateDecision::RecreateWindow,
        (false, false) => ActivateDecision::Ignore,
    }
}

/// Reacts to the platform "reopen" signal and to a tray toggle that finds no
/// window.
pub(crate) fn handle_activate(app_handle: &AppHandle) {
    let Some(context) = app_handle.try_state::<AppContext>() else {
        return;
    };
    let decision = decide_activate(
        context.is_quitting(),
        context.is_ui_ready(),
        main_window::main_window(app_handle).is_some(),
        context.supervisor().state(),
    );
    append_desktop_log(&format!("activate: {decision:?}"));

    match decision {
        ActivateDecision::Ignore => {}
        ActivateDecision::RevealExisting => {
            window_actions::show_main_window(app_handle, DEFAULT_SHELL_LOCALE, append_desktop_log)
        }
        ActivateDecision::RevealAndRestartBackend => {
            window_actions::show_main_window(app_handle, DEFAULT_SHELL_LOCALE, append_desktop_log);
            spawn_backend_recovery(app_handle.clone());
        }
        ActivateDecision::RecreateWindow => recreate_window(app_handle),
        ActivateDecision::RestartBackend => spawn_backend_recovery(app_handle.clone()),
    }
}

/// Called after a tray toggle or a second launch has revealed the window.
pub(crate) fn recover_backend_if_stopped(app_handle: &AppHandle) {
    let Some(context) = app_handle.try_state::<AppContext>() else {
        return;
    };
    let decision = decide_activate(
        context.is_quitting(),
        context.is_ui_ready(),
        true,
        context.supervisor().state(),
    );
    if decision != ActivateDecision::RevealAndRestartBackend {
        return;
    }
    append_desktop_log("window revealed while backend is stopped; restarting it");
    spawn_backend_recovery(app_handle.clone());
}

fn recreate_window(app_handle: &AppHandle) {
    match main_window::create_main_window(app_handle) {
        Ok(_) => tray_labels::update_tray_menu_labels_with_visibility(
            app_handle,
            DEFAULT_SHELL_LOCALE,
            Some(true),
            append_desktop_log,
        ),
        Err(error) => tracing::error!("failed to recreate main window: {error}"),
    }
}

fn spawn_backend_recovery(app_handle: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let Some(context) = app_handle.try_state::<AppContext>() else {
            return;
        };
        let Some(_recovery) = context.try_begin_recovery() else {
            append_startup_log("backend recovery already in progress");
            return;
        };

        append_startup_log("backend is not running; restarting it");
        let supervisor = Arc::clone(context.supervisor());
        if let Err(error) = supervisor.start().await {
            tracing::error!("backend recovery failed: {error}");
            return;
        }
        if context.is_quitting() {
            return;
        }

        let main_app = app_handle.clone();
        if let Err(error) = app_handle.run_on_main_thread(move || restore_window(&main_app)) {
            tracing::error!("failed to schedule main window after recovery: {error}");
        }
    });
}

/// A surviving window still shows the old worker's page, so it is reloaded.
fn restore_window(app_handle: &AppHandle) {
    if main_window::main_window(app_handle).is_some() {
        main_window::reload_main_window(app_handle, append_desktop_log);
    } else {
        recreate_window(app_handle);
    }
}
