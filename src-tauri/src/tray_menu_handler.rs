use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, append_shutdown_log, tray_actions, window_actions, AppContext,
    DEFAULT_SHELL_LOCALE,
};

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ToggleWindow) => {
            window_actions::toggle_main_window(app_handle, DEFAULT_SHELL_LOCALE, append_desktop_log)
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            if let Some(context) = app_handle.try_state::<AppContext>() {
                context.mark_quitting();
            }
            append_shutdown_log("tray quit requested, exiting desktop process");
            app_handle.exit(0);
        }
        None => append_desktop_log(&format!("ignoring unknown tray menu id {menu_id}")),
    }
}
