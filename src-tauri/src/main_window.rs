use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    append_desktop_log, DEV_SERVER_URL_ENV, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL,
    MAIN_WINDOW_WIDTH,
};

const STATIC_ENTRY: &str = "index.html";
const WINDOW_TITLE: &str = "SondaClick";

/// The operations the shell needs from the main window. `WebviewWindow`
/// implements it; tests drive the visibility logic with a fake.
pub(crate) trait WindowSurface {
    fn is_visible(&self) -> Result<bool, String>;
    fn is_minimized(&self) -> Result<bool, String>;
    fn show(&self) -> Result<(), String>;
    fn hide(&self) -> Result<(), String>;
    fn unminimize(&self) -> Result<(), String>;
    fn set_focus(&self) -> Result<(), String>;
}

impl WindowSurface for WebviewWindow {
    fn is_visible(&self) -> Result<bool, String> {
        WebviewWindow::is_visible(self).map_err(|error| error.to_string())
    }

    fn is_minimized(&self) -> Result<bool, String> {
        WebviewWindow::is_minimized(self).map_err(|error| error.to_string())
    }

    fn show(&self) -> Result<(), String> {
        WebviewWindow::show(self).map_err(|error| error.to_string())
    }

    fn hide(&self) -> Result<(), String> {
        WebviewWindow::hide(self).map_err(|error| error.to_string())
    }

    fn unminimize(&self) -> Result<(), String> {
        WebviewWindow::unminimize(self).map_err(|error| error.to_string())
    }

    fn set_focus(&self) -> Result<(), String> {
        WebviewWindow::set_focus(self).map_err(|error| error.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseDecision {
    HideToTray,
    Proceed,
}

pub(crate) fn close_decision(is_quitting: bool) -> CloseDecision {
    if is_quitting {
        CloseDecision::Proceed
    } else {
        CloseDecision::HideToTray
    }
}

pub(crate) fn main_window(app_handle: &AppHandle) -> Option<WebviewWindow> {
    app_handle.get_webview_window(MAIN_WINDOW_LABEL)
}

pub(crate) fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window(app_handle) else {
        log("reload_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.eval("window.location.reload()") {
        log(&format!("failed to reload main window: {error}"));
    }
}

pub(crate) fn parse_dev_server_url(raw: &str) -> Option<Url> {
    let parsed = Url::parse(raw.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(parsed)
}

fn resolve_window_url(app_handle: &AppHandle) -> Result<WebviewUrl, String> {
    if tauri::is_dev() {
        if let Ok(raw) = std::env::var(DEV_SERVER_URL_ENV) {
            match parse_dev_server_url(&raw) {
                Some(url) => return Ok(WebviewUrl::External(url)),
                None => tracing::warn!("ignoring invalid {DEV_SERVER_URL_ENV}={raw:?}"),
            }
        }
        // The configured dev server serves the app URL in development.
        return Ok(WebviewUrl::App(STATIC_ENTRY.into()));
    }

    if app_handle
        .asset_resolver()
        .get(STATIC_ENTRY.to_string())
        .is_none()
    {
        return Err(format!(
            "The bundled frontend entry '{STATIC_ENTRY}' is missing."
        ));
    }
    Ok(WebviewUrl::App(STATIC_ENTRY.into()))
}

/// Builds the single main window. Returns the existing one when it is
/// already open.
pub(crate) fn create_main_window(app_handle: &AppHandle) -> Result<WebviewWindow, String> {
    if let Some(window) = main_window(app_handle) {
        return Ok(window);
    }

    let url = resolve_window_url(app_handle)?;
    append_desktop_log(&format!("creating main window for {url:?}"));
    WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, url)
        .title(WINDOW_TITLE)
        .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
        .center()
        .visible(true)
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_decision_hides_unless_quitting() {
        assert_eq!(close_decision(false), CloseDecision::HideToTray);
        assert_eq!(close_decision(true), CloseDecision::Proceed);
    }

    #[test]
    fn parse_dev_server_url_accepts_http_only() {
        assert_eq!(
            parse_dev_server_url(" http://localhost:5173 ").map(|url| url.port()),
            Some(Some(5173))
        );
        assert!(parse_dev_server_url("https://dev.sondaclick.mx").is_some());
        assert!(parse_dev_server_url("file:///tmp/index.html").is_none());
        assert!(parse_dev_server_url("localhost:5173/").is_none());
    }
}
