use tauri::{AppHandle, Manager};

use crate::{
    notifications, AppContext, BackendBridgeResult, BackendBridgeState, NotificationRequest,
};

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_backend_state(
    app_handle: AppHandle,
) -> Result<BackendBridgeState, String> {
    let context = app_handle
        .try_state::<AppContext>()
        .ok_or_else(|| "Desktop state is not initialised yet.".to_string())?;
    Ok(context.supervisor().bridge_state())
}

#[tauri::command]
pub(crate) fn show_native_notification(
    app_handle: AppHandle,
    title: String,
    body: Option<String>,
) -> BackendBridgeResult {
    let request = NotificationRequest {
        title,
        body: body.unwrap_or_default(),
    };
    match notifications::validate_notification_request(request)
        .and_then(|request| notifications::show_native_notification(&app_handle, &request))
    {
        Ok(()) => BackendBridgeResult {
            ok: true,
            reason: None,
        },
        Err(error) => {
            tracing::warn!("show_native_notification command failed: {error}");
            BackendBridgeResult {
                ok: false,
                reason: Some(error),
            }
        }
    }
}
