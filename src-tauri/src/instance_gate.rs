use tauri::{AppHandle, Manager};

use crate::{
    app_activation,
    main_window::{self, WindowSurface},
    tray_labels, window_actions, AppContext, DEFAULT_SHELL_LOCALE,
};

/// Plugin installing the single-instance lock. It must be the first plugin
/// so a second process exits before anything else is initialised.
pub(crate) fn plugin() -> tauri::plugin::TauriPlugin<tauri::Wry> {
    tauri_plugin_single_instance::init(|app, argv, cwd| on_second_instance(app, argv, cwd))
}

/// Brings an existing window to the front. Returns the resulting visibility,
/// or `None` when there is no window to focus.
pub(crate) fn focus_existing_instance<W, F>(window: Option<&W>, log: F) -> Option<bool>
where
    W: WindowSurface + ?Sized,
    F: Fn(&str),
{
    window.map(|window| window_actions::reveal_window(window, log))
}

fn on_second_instance(app_handle: &AppHandle, argv: Vec<String>, cwd: String) {
    tracing::info!(
        target: "sondaclick::desktop",
        "second launch attempt folded into the running instance (argv={argv:?}, cwd={cwd})"
    );
    if app_handle
        .try_state::<AppContext>()
        .is_some_and(|context| context.is_quitting())
    {
        return;
    }

    let window = main_window::main_window(app_handle);
    match focus_existing_instance(window.as_ref(), crate::append_desktop_log) {
        Some(visible) => {
            tray_labels::update_tray_menu_labels_with_visibility(
                app_handle,
                DEFAULT_SHELL_LOCALE,
                Some(visible),
                crate::append_desktop_log,
            );
            app_activation::recover_backend_if_stopped(app_handle);
        }
        None => app_activation::handle_activate(app_handle),
    }
}
