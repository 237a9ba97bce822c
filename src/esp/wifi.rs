//! Wi-Fi station bring-up and event wiring.
//!
//! The radio is configured once and started; from then on every state
//! change flows through the system event loop into the shared
//! [`ConnectionManager`], which decides when to ask the radio to
//! reconnect.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::{EspSubscription, EspSystemEventLoop, System};
use esp_idf_svc::netif::IpEvent;
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi, WifiEvent};
use log::info;

use weather_panel::config::{WIFI_PASS, WIFI_SSID};
use weather_panel::wifi::{self as link, ConnectionManager, WifiControl};

use super::esp_check;

/// Asks the ESP-IDF Wi-Fi driver for a station connect attempt.
///
/// Connect completion (or failure) arrives later as a driver event;
/// this only queues the request.
pub struct RadioControl;

impl WifiControl for RadioControl {
    fn request_connect(&mut self) -> Result<()> {
        esp_check(unsafe { esp_idf_sys::esp_wifi_connect() }, "esp_wifi_connect")
    }
}

/// Keeps the driver and its event subscriptions alive.
///
/// Dropping this tears down the subscriptions and stops the radio.
pub struct WifiLink {
    _wifi: Box<EspWifi<'static>>,
    _wifi_events: EspSubscription<'static, System>,
    _ip_events: EspSubscription<'static, System>,
}

/// Configures the station, hooks the event loop up to `manager` and
/// issues the first connect request.
pub fn bring_up(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    manager: Arc<ConnectionManager>,
) -> Result<WifiLink> {
    let mut wifi = Box::new(EspWifi::new(modem, sysloop.clone(), None)?);

    let auth = if WIFI_PASS.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };

    let mut wifi_ssid = heapless::String::<32>::new();
    let mut wifi_pass = heapless::String::<64>::new();
    wifi_ssid.push_str(WIFI_SSID).ok();
    wifi_pass.push_str(WIFI_PASS).ok();

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: wifi_ssid,
        password: wifi_pass,
        auth_method: auth,
        ..Default::default()
    }))?;

    // Subscribe before start() so the StaStarted event is not missed.
    let wifi_events = {
        let manager = manager.clone();
        sysloop.subscribe::<WifiEvent, _>(move |event| {
            let mapped = match event {
                WifiEvent::StaStarted => Some(link::WifiEvent::StationStarted),
                WifiEvent::StaConnected(_) => Some(link::WifiEvent::Connected),
                WifiEvent::StaDisconnected(_) => Some(link::WifiEvent::Disconnected),
                _ => None,
            };
            if let Some(event) = mapped {
                manager.handle_event(event, &mut RadioControl);
            }
        })?
    };

    let ip_events = {
        let manager = manager.clone();
        sysloop.subscribe::<IpEvent, _>(move |event| {
            if let IpEvent::DhcpIpAssigned(assignment) = event {
                manager.handle_event(
                    link::WifiEvent::IpAcquired(assignment.ip()),
                    &mut RadioControl,
                );
            }
        })?
    };

    wifi.start()?;
    info!("WiFi station started (target '{}')", WIFI_SSID);
    std::thread::sleep(Duration::from_secs(1));

    // First connect attempt belongs to bring-up; the retry budget only
    // covers reconnects after a drop.
    manager.mark_connecting();
    let mut radio = RadioControl;
    radio.request_connect()?;
    std::thread::sleep(Duration::from_secs(2));
    info!("WiFi bring-up complete");

    Ok(WifiLink {
        _wifi: wifi,
        _wifi_events: wifi_events,
        _ip_events: ip_events,
    })
}
