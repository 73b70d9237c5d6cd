use std::time::Duration;

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 1200.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 800.0;
pub(crate) const TRAY_ID: &str = "sondaclick-tray";
pub(crate) const TRAY_ICON_RESOURCE: &str = "icons/tray.png";

pub(crate) const DEFAULT_SHELL_LOCALE: &str = "es-MX";
pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const BACKEND_LOG_FILE: &str = "backend.log";
pub(crate) const LOG_FILTER_ENV: &str = "SONDACLICK_LOG";
pub(crate) const LOCALE_ENV: &str = "SONDACLICK_DESKTOP_LOCALE";
pub(crate) const DEV_SERVER_URL_ENV: &str = "VITE_DEV_SERVER_URL";

pub(crate) const ENV_FILE_ENV: &str = "SONDACLICK_ENV_FILE";
pub(crate) const ENV_OVERRIDE_ENV: &str = "SONDACLICK_ENV_OVERRIDE";
pub(crate) const ENV_FILE_NAME: &str = ".env";
pub(crate) const PACKAGED_ENV_DIR: &str = "packaged-resources";

pub(crate) const BACKEND_EXECUTABLE_STEM: &str = "SondaClickBackend";
pub(crate) const PACKAGED_BACKEND_DIR: &str = "packaged-backend";
pub(crate) const DEFAULT_BACKEND_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_BACKEND_PORT: u16 = 5000;
pub(crate) const HEALTH_CHECK_PATH: &str = "/api/check-domain";
pub(crate) const SHUTDOWN_PATH: &str = "/shutdown";

pub(crate) const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(3_000);
pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_500);
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 20;
pub(crate) const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1_000);
pub(crate) const DEFAULT_SHUTDOWN_REQUEST_TIMEOUT: Duration = Duration::from_millis(2_000);
pub(crate) const DEFAULT_CLEANUP_TIMEOUT: Duration = Duration::from_millis(8_000);
pub(crate) const WORKER_EXIT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub(crate) const HARD_EXIT_GRACE: Duration = Duration::from_secs(2);
pub(crate) const WELCOME_NOTIFICATION_DELAY: Duration = Duration::from_secs(3);

pub(crate) const MAIN_PROCESS_MESSAGE_EVENT: &str = "main-process-message";
pub(crate) const NATIVE_NOTIFICATION_EVENT: &str = "show-native-notification";
