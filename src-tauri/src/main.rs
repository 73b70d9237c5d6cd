#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_activation;
mod app_constants;
mod app_runtime;
mod app_types;
mod backend_config;
mod backend_http;
mod backend_path;
mod backend_supervisor;
mod desktop_bridge_commands;
mod env_loader;
mod exit_events;
mod exit_state;
mod instance_gate;
mod launch_plan;
mod logging;
mod main_window;
mod notifications;
mod process_control;
mod runtime_paths;
mod shell_locale;
mod startup_task;
mod tray_actions;
mod tray_labels;
mod tray_menu_handler;
mod tray_setup;
mod window_actions;
mod worker_state;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    AppContext, BackendBridgeResult, BackendBridgeState, NotificationRequest, TrayMenuState,
};
pub(crate) use logging::{append_desktop_log, append_shutdown_log, append_startup_log};

fn main() {
    logging::init_logging();
    app_runtime::run();
}
