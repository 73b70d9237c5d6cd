use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager,
};

use crate::{
    append_desktop_log, append_shutdown_log, main_window, runtime_paths, shell_locale,
    tray_actions, tray_labels, tray_menu_handler, window_actions, TrayMenuState,
    DEFAULT_SHELL_LOCALE, TRAY_ICON_RESOURCE, TRAY_ID,
};

fn load_tray_icon(app_handle: &AppHandle) -> Result<Image<'static>, String> {
    let bundled = runtime_paths::resolve_resource_path(app_handle, TRAY_ICON_RESOURCE)
        .ok_or_else(|| format!("tray icon resource {TRAY_ICON_RESOURCE} is not available"))
        .and_then(|path| {
            Image::from_path(&path)
                .map_err(|error| format!("failed to decode tray icon {}: {error}", path.display()))
        });

    match bundled {
        Ok(icon) => Ok(icon),
        Err(error) => {
            append_desktop_log(&format!("{error}; falling back to the window icon"));
            app_handle
                .default_window_icon()
                .map(|icon| icon.clone().to_owned())
                .ok_or_else(|| "no tray icon image could be loaded".to_string())
        }
    }
}

/// Builds the tray icon and its two-entry menu. Failure leaves the app
/// running without a tray.
pub fn setup_tray(app_handle: &AppHandle) -> Result<(), String> {
    if app_handle.tray_by_id(TRAY_ID).is_some() {
        return Ok(());
    }

    let icon = load_tray_icon(app_handle)?;
    let shell_texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
    let main_window_visible = main_window::main_window(app_handle)
        .and_then(|window| window.is_visible().ok())
        .unwrap_or(false);

    let toggle_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_TOGGLE_WINDOW,
        tray_labels::toggle_label(&shell_texts, main_window_visible),
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray toggle menu item: {error}"))?;
    let quit_item = MenuItem::with_id(
        app_handle,
        tray_actions::TRAY_MENU_QUIT,
        shell_texts.tray_quit,
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create tray quit menu item: {error}"))?;
    let separator = PredefinedMenuItem::separator(app_handle)
        .map_err(|error| format!("Failed to create tray separator menu item: {error}"))?;

    let menu = Menu::with_items(app_handle, &[&toggle_item, &separator, &quit_item])
        .map_err(|error| format!("Failed to build tray menu: {error}"))?;

    if !app_handle.manage(TrayMenuState {
        toggle_item: toggle_item.clone(),
        quit_item: quit_item.clone(),
    }) {
        append_desktop_log("tray menu state already exists, skipping manage");
    }

    TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(shell_texts.tray_tooltip)
        .icon(icon)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| {
            tray_menu_handler::handle_tray_menu_event(app, event.id().as_ref())
        })
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                window_actions::toggle_main_window(
                    tray.app_handle(),
                    DEFAULT_SHELL_LOCALE,
                    append_desktop_log,
                );
            }
        })
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;

    tray_labels::update_tray_menu_labels(app_handle, DEFAULT_SHELL_LOCALE, append_desktop_log);
    Ok(())
}

pub fn destroy_tray(app_handle: &AppHandle) {
    match app_handle.remove_tray_by_id(TRAY_ID) {
        Some(_) => append_shutdown_log("tray icon removed"),
        None => append_shutdown_log("no tray icon to remove"),
    }
}
