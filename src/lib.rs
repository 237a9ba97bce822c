//! Coordination core for the weather panel firmware.
//!
//! Everything in here runs on the host as plain `std` Rust: the Wi-Fi
//! connection state machine, the weather fetch scheduler, the GUI lock
//! shell, and the screen rotation. The device-facing collaborators
//! (render engine, HTTP transport, Wi-Fi control) are traits; the
//! `esp32` binary provides the ESP-IDF implementations.

pub mod config;
pub mod error;
pub mod fetch;
pub mod gui;
pub mod http;
pub mod state;
pub mod views;
pub mod weather;
pub mod wifi;
