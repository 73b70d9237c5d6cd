use std::sync::Arc;

use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{
    append_shutdown_log, exit_state::ExitRequestDecision, tray_setup, AppContext, HARD_EXIT_GRACE,
};

/// Runs for every exit request, including the one we issue ourselves once
/// cleanup is done. The default action is always prevented before any async
/// work starts so the forced exit below stays reachable.
pub(crate) fn handle_exit_requested(app_handle: &AppHandle, code: Option<i32>, api: &ExitRequestApi) {
    let Some(context) = app_handle.try_state::<AppContext>() else {
        return;
    };
    let decision = context
        .exit_state()
        .on_exit_requested(code, context.is_quitting());

    match decision {
        ExitRequestDecision::PersistInTray => {
            api.prevent_exit();
            append_shutdown_log("all windows closed; staying in the tray");
        }
        ExitRequestDecision::WaitForCleanup => {
            api.prevent_exit();
            append_shutdown_log("exit requested again while cleanup is running; ignoring");
        }
        ExitRequestDecision::AllowExit => {
            append_shutdown_log("cleanup finished; allowing exit");
        }
        ExitRequestDecision::StartCleanup => {
            api.prevent_exit();
            context.mark_quitting();
            append_shutdown_log(&format!("quit requested (code {code:?}); starting cleanup"));
            tray_setup::destroy_tray(app_handle);
            spawn_cleanup(app_handle.clone(), Arc::clone(context.supervisor()));
        }
    }
}

fn spawn_cleanup(app_handle: AppHandle, supervisor: Arc<crate::backend_supervisor::DesktopSupervisor>) {
    tauri::async_runtime::spawn(async move {
        supervisor.shutdown().await;

        let exit_code = match app_handle.try_state::<AppContext>() {
            Some(context) => context.exit_state().mark_cleanup_finished(),
            None => 0,
        };
        append_shutdown_log(&format!("backend cleanup settled; exiting with code {exit_code}"));
        app_handle.exit(exit_code);

        // The event loop should end the process; this covers a hung loop.
        tokio::time::sleep(HARD_EXIT_GRACE).await;
        append_shutdown_log("event loop did not exit in time; forcing process exit");
        std::process::exit(exit_code);
    });
}

pub(crate) fn handle_exit_event(_app_handle: &AppHandle) {
    append_shutdown_log("desktop process exiting");
}
