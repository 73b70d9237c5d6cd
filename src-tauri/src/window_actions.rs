use tauri::AppHandle;

use crate::{
    app_activation,
    main_window::{self, WindowSurface},
    tray_labels,
};

/// Restores, shows and focuses the window. Returns the visibility read back
/// afterwards.
pub(crate) fn reveal_window<W, F>(window: &W, log: F) -> bool
where
    W: WindowSurface + ?Sized,
    F: Fn(&str),
{
    if let Ok(true) = window.is_minimized() {
        if let Err(error) = window.unminimize() {
            log(&format!("failed to unminimize main window: {error}"));
        }
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
    window.is_visible().unwrap_or(true)
}

pub(crate) fn conceal_window<W, F>(window: &W, log: F) -> bool
where
    W: WindowSurface + ?Sized,
    F: Fn(&str),
{
    if let Err(error) = window.hide() {
        log(&format!("failed to hide main window: {error}"));
    }
    window.is_visible().unwrap_or(false)
}

/// Flips visibility. `None` when the current visibility cannot be read.
pub(crate) fn toggle_window<W, F>(window: &W, log: F) -> Option<bool>
where
    W: WindowSurface + ?Sized,
    F: Fn(&str),
{
    match window.is_visible() {
        Ok(true) => Some(conceal_window(window, log)),
        Ok(false) => Some(reveal_window(window, log)),
        Err(error) => {
            log(&format!(
                "failed to read main window visibility in toggle_main_window: {error}"
            ));
            None
        }
    }
}

pub fn show_main_window<F>(app_handle: &AppHandle, default_shell_locale: &'static str, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window::main_window(app_handle) else {
        log("show_main_window skipped: main window not found");
        return;
    };
    let visible = reveal_window(&window, &log);
    tray_labels::update_tray_menu_labels_with_visibility(
        app_handle,
        default_shell_locale,
        Some(visible),
        log,
    );
}

pub fn hide_main_window<F>(app_handle: &AppHandle, default_shell_locale: &'static str, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window::main_window(app_handle) else {
        log("hide_main_window skipped: main window not found");
        return;
    };
    let visible = conceal_window(&window, &log);
    tray_labels::update_tray_menu_labels_with_visibility(
        app_handle,
        default_shell_locale,
        Some(visible),
        log,
    );
}

/// Shared by the tray icon click and the tray menu entry. Without a window
/// this behaves like an activation.
pub fn toggle_main_window<F>(app_handle: &AppHandle, default_shell_locale: &'static str, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window::main_window(app_handle) else {
        log("toggle_main_window found no main window; treating as activation");
        app_activation::handle_activate(app_handle);
        return;
    };

    let visible = toggle_window(&window, &log);
    tray_labels::update_tray_menu_labels_with_visibility(
        app_handle,
        default_shell_locale,
        visible,
        log,
    );
    if visible == Some(true) {
        app_activation::recover_backend_if_stopped(app_handle);
    }
}
