use std::sync::Arc;

use tauri::{AppHandle, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use crate::{
    append_startup_log,
    backend_config,
    backend_http::ReqwestBackendHttp,
    backend_path::BackendLocation,
    backend_supervisor::DesktopSupervisor,
    env_loader,
    launch_plan::{self, LaunchPlan},
    logging, main_window, notifications,
    process_control::SystemProcessLauncher,
    runtime_paths, shell_locale, tray_setup, AppContext, BACKEND_LOG_FILE, DEFAULT_SHELL_LOCALE,
};

/// Loads the env file and builds the supervisor from the resulting
/// configuration. Nothing is spawned yet.
pub(crate) fn prepare_supervisor(
    app_handle: &AppHandle,
    packaged_mode: bool,
) -> Result<Arc<DesktopSupervisor>, String> {
    let env_entries = match env_loader::resolve_env_file_path(app_handle, packaged_mode) {
        Some(path) => env_loader::load(&path, env_loader::override_requested()),
        None => {
            tracing::warn!("env file location could not be resolved; continuing without it");
            env_loader::EnvEntries::new()
        }
    };

    let endpoint = backend_config::endpoint_from_env();
    let timings = backend_config::timings_from_env();
    let args = launch_plan::backend_args_from_env()?;
    let plan = LaunchPlan {
        location: BackendLocation::for_app(app_handle, packaged_mode),
        args,
        env: env_entries,
        log_path: Some(logging::resolve_desktop_log_path(
            runtime_paths::default_packaged_root_dir(),
            BACKEND_LOG_FILE,
        )),
    };
    append_startup_log(&format!(
        "backend endpoint {} (packaged: {packaged_mode}, candidates: {:?})",
        endpoint.base_url(),
        plan.location.candidates()
    ));

    let http = ReqwestBackendHttp::new(
        &endpoint,
        timings.probe_timeout.max(timings.shutdown_request_timeout),
    )?;
    Ok(Arc::new(DesktopSupervisor::new(
        plan,
        timings,
        http,
        SystemProcessLauncher,
    )))
}

/// Starts the backend and only then builds the window and tray.
pub(crate) fn spawn_startup_task(app_handle: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let Some(supervisor) = app_handle
            .try_state::<AppContext>()
            .map(|context| Arc::clone(context.supervisor()))
        else {
            return;
        };

        append_startup_log("starting backend");
        if let Err(error) = supervisor.start().await {
            fail_startup(&app_handle, &error.to_string());
            return;
        }

        let main_app = app_handle.clone();
        if let Err(error) = app_handle.run_on_main_thread(move || finish_startup(&main_app)) {
            fail_startup(
                &app_handle,
                &format!("Failed to schedule window creation: {error}"),
            );
        }
    });
}

fn finish_startup(app_handle: &AppHandle) {
    if let Err(error) = main_window::create_main_window(app_handle) {
        fail_startup(app_handle, &error);
        return;
    }
    if let Err(error) = tray_setup::setup_tray(app_handle) {
        tracing::warn!("tray unavailable, continuing without it: {error}");
    }
    if let Some(context) = app_handle.try_state::<AppContext>() {
        context.mark_ui_ready();
    }
    append_startup_log("desktop shell ready");
    notifications::schedule_welcome_notification(app_handle);
}

/// Single exit point for startup failures: blocking error dialog, then quit
/// with code 1.
pub(crate) fn fail_startup(app_handle: &AppHandle, detail: &str) {
    tracing::error!(target: "sondaclick::startup", "startup failed: {detail}");
    let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
    let exit_app = app_handle.clone();
    app_handle
        .dialog()
        .message(format!("{}\n\n{detail}", texts.startup_error_body))
        .title(texts.startup_error_title)
        .kind(MessageDialogKind::Error)
        .show(move |_| {
            if let Some(context) = exit_app.try_state::<AppContext>() {
                context.mark_quitting();
            }
            exit_app.exit(1);
        });
}
