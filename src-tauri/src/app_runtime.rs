use tauri::{webview::PageLoadEvent, Emitter, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, exit_events, instance_gate,
    main_window::{self, CloseDecision},
    notifications, startup_task, window_actions, AppContext, DEFAULT_SHELL_LOCALE,
    MAIN_PROCESS_MESSAGE_EVENT, MAIN_WINDOW_LABEL,
};

const PAGE_MESSAGE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    tauri::Builder::default()
        .plugin(instance_gate::plugin())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_notification::init())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_get_backend_state,
            crate::desktop_bridge_commands::show_native_notification,
        ])
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            let app_handle = window.app_handle();
            let quitting = app_handle
                .try_state::<AppContext>()
                .is_some_and(|context| context.is_quitting());

            match event {
                WindowEvent::CloseRequested { api, .. } => {
                    if main_window::close_decision(quitting) == CloseDecision::Proceed {
                        return;
                    }
                    api.prevent_close();
                    window_actions::hide_main_window(
                        app_handle,
                        DEFAULT_SHELL_LOCALE,
                        append_desktop_log,
                    );
                }
                WindowEvent::Focused(false) => {
                    if let Ok(true) = window.is_minimized() {
                        if !quitting {
                            window_actions::hide_main_window(
                                app_handle,
                                DEFAULT_SHELL_LOCALE,
                                append_desktop_log,
                            );
                        }
                    }
                }
                _ => {}
            }
        })
        .on_page_load(|webview, payload| {
            if !matches!(payload.event(), PageLoadEvent::Finished) {
                return;
            }
            append_desktop_log(&format!("page-load finished: {}", payload.url()));
            let message = chrono::Local::now()
                .format(PAGE_MESSAGE_TIME_FORMAT)
                .to_string();
            if let Err(error) = webview.emit_to(webview.label(), MAIN_PROCESS_MESSAGE_EVENT, message)
            {
                append_desktop_log(&format!(
                    "failed to emit {MAIN_PROCESS_MESSAGE_EVENT}: {error}"
                ));
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            let packaged_mode = !tauri::is_dev();

            let supervisor = match startup_task::prepare_supervisor(&app_handle, packaged_mode) {
                Ok(supervisor) => supervisor,
                Err(error) => {
                    startup_task::fail_startup(&app_handle, &error);
                    return Ok(());
                }
            };
            let listener_app = app_handle.clone();
            supervisor.set_exit_listener(Box::new(move |exit| {
                notifications::notify_unexpected_worker_exit(&listener_app, exit)
            }));

            app_handle.manage(AppContext::new(supervisor));
            notifications::listen_for_notification_requests(&app_handle);
            startup_task::spawn_startup_task(app_handle);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                exit_events::handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                crate::app_activation::handle_activate(app_handle);
            }
            _ => {}
        });
}
