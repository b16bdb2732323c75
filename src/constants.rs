//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default log endpoint, only edit this file.

/// Default dashboard refresh interval (milliseconds)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5000;

/// Default URL of the log endpoint served by the collection layer
pub const DEFAULT_LOGS_URL: &str = "http://localhost:3000/api/logs";

/// Default path of the exported Sysmon log file
pub const DEFAULT_LOGS_FILE: &str = "public/sysmon-logs.json";

/// HTTP request timeout (seconds)
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum entries per recent-activity list
pub const MAX_RECENT_ENTRIES: usize = 10;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Sysmon Dashboard Core";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get the refresh interval from environment or use default
pub fn get_refresh_interval_ms() -> u64 {
    std::env::var("SYSMON_REFRESH_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_MS)
}

/// Get the log endpoint URL from environment or use default
pub fn get_logs_url() -> String {
    std::env::var("SYSMON_LOGS_URL").unwrap_or_else(|_| DEFAULT_LOGS_URL.to_string())
}

/// Get the log file path from environment or use default
pub fn get_logs_file() -> String {
    std::env::var("SYSMON_LOGS_FILE").unwrap_or_else(|_| DEFAULT_LOGS_FILE.to_string())
}
