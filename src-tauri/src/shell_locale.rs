use std::env;

use crate::LOCALE_ENV;

#[derive(Debug, Clone, Copy)]
pub struct ShellTexts {
    pub tray_hide: &'static str,
    pub tray_show: &'static str,
    pub tray_quit: &'static str,
    pub tray_tooltip: &'static str,
    pub startup_error_title: &'static str,
    pub startup_error_body: &'static str,
    pub welcome_title: &'static str,
    pub welcome_body: &'static str,
    pub worker_exit_title: &'static str,
    pub worker_exit_body: &'static str,
}

pub fn shell_texts_for_locale(locale: &str) -> ShellTexts {
    if locale == "en-US" {
        return ShellTexts {
            tray_hide: "Hide SondaClick",
            tray_show: "Show SondaClick",
            tray_quit: "Quit",
            tray_tooltip: "SondaClick",
            startup_error_title: "SondaClick could not start",
            startup_error_body: "The SondaClick service did not start correctly. The application will close.",
            welcome_title: "Welcome to SondaClick!",
            welcome_body: "The application started successfully.",
            worker_exit_title: "SondaClick service stopped",
            worker_exit_body: "The background service stopped unexpectedly. Reopen the window to restart it.",
        };
    }

    ShellTexts {
        tray_hide: "Ocultar SondaClick",
        tray_show: "Mostrar SondaClick",
        tray_quit: "Salir",
        tray_tooltip: "SondaClick",
        startup_error_title: "No se pudo iniciar SondaClick",
        startup_error_body: "El servicio de SondaClick no se inició correctamente. La aplicación se cerrará.",
        welcome_title: "¡Bienvenido a SondaClick!",
        welcome_body: "La aplicación se ha iniciado correctamente.",
        worker_exit_title: "El servicio de SondaClick se detuvo",
        worker_exit_body: "El servicio en segundo plano se detuvo inesperadamente. Vuelve a abrir la ventana para reiniciarlo.",
    }
}

pub fn resolve_shell_locale(default_shell_locale: &'static str) -> &'static str {
    for env_key in [LOCALE_ENV, "LC_ALL", "LANG"] {
        if let Ok(value) = env::var(env_key) {
            if let Some(locale) = normalize_shell_locale(&value) {
                return locale;
            }
        }
    }

    default_shell_locale
}

/// Texts for the locale picked from the environment.
pub fn current_shell_texts(default_shell_locale: &'static str) -> ShellTexts {
    shell_texts_for_locale(resolve_shell_locale(default_shell_locale))
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw == "es-MX" {
        return Some("es-MX");
    }
    if raw == "en-US" {
        return Some("en-US");
    }

    let lowered = raw.to_ascii_lowercase();
    if lowered.starts_with("es") {
        return Some("es-MX");
    }
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    None
}
