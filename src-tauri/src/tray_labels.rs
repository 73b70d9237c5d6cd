use tauri::{menu::MenuItem, AppHandle, Manager};

use crate::{
    main_window::{self, WindowSurface},
    shell_locale::{self, ShellTexts},
    tray_actions, TrayMenuState,
};

/// Label of the toggle entry: offers the action opposite to the current
/// visibility.
pub fn toggle_label(shell_texts: &ShellTexts, visible: bool) -> &'static str {
    if visible {
        shell_texts.tray_hide
    } else {
        shell_texts.tray_show
    }
}

fn set_menu_text_safe<F>(item: &MenuItem<tauri::Wry>, text: &str, item_name: &str, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = item.set_text(text) {
        log(&format!(
            "failed to update tray menu text for {}: {}",
            item_name, error
        ));
    }
}

pub fn update_tray_menu_labels<F>(
    app_handle: &AppHandle,
    default_shell_locale: &'static str,
    log: F,
) where
    F: Fn(&str),
{
    update_tray_menu_labels_with_visibility(app_handle, default_shell_locale, None, log);
}

/// Rewrites both menu entries. `visible_override` carries the visibility the
/// caller just applied so the label does not depend on the window manager
/// having caught up yet.
pub fn update_tray_menu_labels_with_visibility<F>(
    app_handle: &AppHandle,
    default_shell_locale: &'static str,
    visible_override: Option<bool>,
    log: F,
) where
    F: Fn(&str),
{
    let Some(tray_state) = app_handle.try_state::<TrayMenuState>() else {
        return;
    };

    let shell_texts = shell_locale::current_shell_texts(default_shell_locale);
    let effective_visible = visible_override.unwrap_or_else(|| {
        main_window::main_window(app_handle)
            .and_then(|window| WindowSurface::is_visible(&window).ok())
            .unwrap_or(false)
    });

    set_menu_text_safe(
        &tray_state.toggle_item,
        toggle_label(&shell_texts, effective_visible),
        tray_actions::TRAY_MENU_TOGGLE_WINDOW,
        &log,
    );
    set_menu_text_safe(
        &tray_state.quit_item,
        shell_texts.tray_quit,
        tray_actions::TRAY_MENU_QUIT,
        &log,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_label_offers_the_opposite_action() {
        let texts = shell_locale::shell_texts_for_locale("es-MX");
        assert_eq!(toggle_label(&texts, true), "Ocultar SondaClick");
        assert_eq!(toggle_label(&texts, false), "Mostrar SondaClick");
    }
}
