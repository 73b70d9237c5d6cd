use tauri::{AppHandle, Listener, Manager};
use tauri_plugin_notification::NotificationExt;

use crate::{
    append_desktop_log, process_control::WorkerExit, shell_locale, AppContext, NotificationRequest,
    DEFAULT_SHELL_LOCALE, NATIVE_NOTIFICATION_EVENT, WELCOME_NOTIFICATION_DELAY,
};

pub(crate) fn parse_notification_request(raw: &str) -> Result<NotificationRequest, String> {
    let request: NotificationRequest = serde_json::from_str(raw)
        .map_err(|error| format!("Invalid notification payload: {error}"))?;
    validate_notification_request(request)
}

pub(crate) fn validate_notification_request(
    request: NotificationRequest,
) -> Result<NotificationRequest, String> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err("Notification title is empty.".to_string());
    }
    Ok(NotificationRequest {
        title: title.to_string(),
        body: request.body,
    })
}

pub(crate) fn show_native_notification(
    app_handle: &AppHandle,
    request: &NotificationRequest,
) -> Result<(), String> {
    app_handle
        .notification()
        .builder()
        .title(&request.title)
        .body(&request.body)
        .show()
        .map_err(|error| format!("Failed to show notification: {error}"))
}

/// Handles `show-native-notification` events emitted by the page.
pub(crate) fn listen_for_notification_requests(app_handle: &AppHandle) {
    let listener_app = app_handle.clone();
    app_handle.listen_any(NATIVE_NOTIFICATION_EVENT, move |event| {
        let result = parse_notification_request(event.payload())
            .and_then(|request| show_native_notification(&listener_app, &request));
        if let Err(error) = result {
            tracing::warn!("{NATIVE_NOTIFICATION_EVENT} ignored: {error}");
        }
    });
}

pub(crate) fn schedule_welcome_notification(app_handle: &AppHandle) {
    let app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(WELCOME_NOTIFICATION_DELAY).await;
        if app_handle
            .try_state::<AppContext>()
            .is_some_and(|context| context.is_quitting())
        {
            return;
        }

        let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
        let request = NotificationRequest {
            title: texts.welcome_title.to_string(),
            body: texts.welcome_body.to_string(),
        };
        if let Err(error) = show_native_notification(&app_handle, &request) {
            append_desktop_log(&format!("welcome notification skipped: {error}"));
        }
    });
}

pub(crate) fn notify_unexpected_worker_exit(app_handle: &AppHandle, exit: WorkerExit) {
    let texts = shell_locale::current_shell_texts(DEFAULT_SHELL_LOCALE);
    let request = NotificationRequest {
        title: texts.worker_exit_title.to_string(),
        body: format!("{} (code {:?})", texts.worker_exit_body, exit.code),
    };
    if let Err(error) = show_native_notification(app_handle, &request) {
        append_desktop_log(&format!("worker exit notification skipped: {error}"));
    }
}
