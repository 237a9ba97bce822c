//! ESP-IDF wiring around the platform-neutral core.

pub mod engine;
pub mod framebuffer;
pub mod http;
pub mod panel;
pub mod wifi;

use anyhow::Result;

pub fn esp_check(res: esp_idf_sys::esp_err_t, msg: &str) -> Result<()> {
    if res != esp_idf_sys::ESP_OK {
        Err(anyhow::anyhow!("{} (err {})", msg, res))
    } else {
        Ok(())
    }
}
