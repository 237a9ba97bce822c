//! Compiled-in configuration.
//!
//! Credentials and API parameters are baked in at build time. Drop a
//! `wifi.local.rs` next to `Cargo.toml` to override the defaults without
//! touching tracked sources (see `build.rs`).

use std::time::Duration;

// ── Credentials & API parameters ────────────────────────────────────

pub const WIFI_SSID: &str = match option_env!("LOCAL_WIFI_SSID") {
    Some(v) => v,
    None => "AIRCON",
};

pub const WIFI_PASS: &str = match option_env!("LOCAL_WIFI_PASS") {
    Some(v) => v,
    None => "LT123456",
};

pub const OPENWEATHER_API_KEY: &str = match option_env!("LOCAL_OPENWEATHER_API_KEY") {
    Some(v) => v,
    None => "1488d3fe9e946724785b07a62a92b786",
};

pub const CITY: &str = "Mumbai";
pub const COUNTRY_CODE: &str = "IN";

// ── Timing ──────────────────────────────────────────────────────────

pub const FETCH_INTERVAL_SECS: u64 = 300;
pub const SCREEN_ROTATE_SECS: u64 = 5;
pub const TICK_PERIOD_MS: u64 = 1;
pub const RENDER_PERIOD_MS: u64 = 10;
pub const SCREEN_TRANSITION_MS: u32 = 1_000;

// ── Bounds ──────────────────────────────────────────────────────────

pub const WIFI_MAX_RETRIES: u32 = 3;
pub const MAX_RESPONSE_BYTES: usize = 32 * 1024;
pub const HTTP_TIMEOUT_MS: u64 = 15_000;

/// Fixed UTC+5:30 offset applied when deriving the local time string.
pub const LOCAL_TIME_OFFSET_SECS: i64 = 19_800;

/// Tunable subset of the configuration, carried by value into the fetch
/// scheduler so tests can vary the periods and bounds.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: &'static str,
    pub city: &'static str,
    pub country_code: &'static str,
    pub fetch_interval: Duration,
    pub wifi_max_retries: u32,
    pub local_time_offset_secs: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: OPENWEATHER_API_KEY,
            city: CITY,
            country_code: COUNTRY_CODE,
            fetch_interval: Duration::from_secs(FETCH_INTERVAL_SECS),
            wifi_max_retries: WIFI_MAX_RETRIES,
            local_time_offset_secs: LOCAL_TIME_OFFSET_SECS,
        }
    }
}
