//! ESP32 weather panel firmware.
//!
//! Wiring only: the panel, the radio, the HTTP client and the tick
//! timer are stood up here and handed to the coordination core in the
//! `weather_panel` library.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::timer::EspTaskTimerService;
use log::info;

mod esp;

use weather_panel::config::{
    AppConfig, RENDER_PERIOD_MS, SCREEN_ROTATE_SECS, TICK_PERIOD_MS, WIFI_MAX_RETRIES,
};
use weather_panel::fetch::FetchScheduler;
use weather_panel::gui::{Gui, ScreenTransition};
use weather_panel::state::WeatherStore;
use weather_panel::views::{main_screen, ScreenRotation};
use weather_panel::wifi::ConnectionManager;

use esp::engine::FramebufferEngine;
use esp::framebuffer::{Framebuffer, FB_HEIGHT, FB_WIDTH};
use esp::http::EspTransport;
use esp::panel;

fn main() -> Result<()> {
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("BOOT — esp32-weather-panel v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Display panel + framebuffer ──
    let panel = panel::init_panel()?;
    let fb = Framebuffer::new(FB_WIDTH, FB_HEIGHT);
    let gui = Arc::new(Gui::new(FramebufferEngine::new(fb, panel)));

    // Render the boot screen before the backlight comes on.
    gui.load_screen(main_screen::build(), ScreenTransition::SlideRight, 0, 0);
    gui.process();
    panel::enable_backlight();

    // ── 2. Render loop ──
    {
        let gui = gui.clone();
        std::thread::Builder::new()
            .name("gui".into())
            .stack_size(12288)
            .spawn(move || loop {
                std::thread::sleep(Duration::from_millis(RENDER_PERIOD_MS));
                gui.process();
            })
            .expect("failed to spawn gui thread");
    }
    gui.mark_ready();

    // ── 3. Tick timer ──
    let timer_service = EspTaskTimerService::new()?;
    let tick_timer = {
        let gui = gui.clone();
        timer_service.timer(move || gui.tick(TICK_PERIOD_MS as u32))?
    };
    tick_timer.every(Duration::from_millis(TICK_PERIOD_MS))?;

    // ── 4. WiFi ──
    let peripherals = unsafe { Peripherals::new() };
    let sysloop = EspSystemEventLoop::take()?;
    let wifi_state = Arc::new(ConnectionManager::new(WIFI_MAX_RETRIES));
    let _wifi = esp::wifi::bring_up(peripherals.modem, sysloop, wifi_state.clone())?;

    // ── 5. Fetch + rotation loop ──
    let started = Instant::now();
    let store = WeatherStore::new();
    let mut scheduler = FetchScheduler::new(AppConfig::default());
    let mut transport = EspTransport;
    let mut rotation = ScreenRotation::new();

    info!("Entering fetch + rotation loop");
    loop {
        std::thread::sleep(Duration::from_secs(SCREEN_ROTATE_SECS));
        scheduler.maybe_fetch(started.elapsed(), &wifi_state, &mut transport, &store);
        rotation.advance(&gui, &store);
    }
}
