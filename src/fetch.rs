//! Periodic weather-fetch scheduling.
//!
//! One scheduler instance lives on the sensor task. Each loop iteration
//! calls [`FetchScheduler::maybe_fetch`] with the current monotonic time;
//! the scheduler enforces the fetch window, performs the blocking request
//! when due, and publishes the parsed snapshot.

use std::time::Duration;

use log::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{FetchError, TransportError};
use crate::http::{HttpTransport, ResponseBuffer};
use crate::state::WeatherStore;
use crate::weather::{self, WeatherSnapshot};
use crate::wifi::ConnectionManager;

/// What one scheduler pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Station not connected; nothing attempted, window untouched.
    NotConnected,
    /// Inside the current fetch window; nothing attempted.
    NotDue,
    /// Fetched, parsed, and published a fresh snapshot.
    Updated,
    /// Request or status failure; snapshot unchanged.
    TransportFailed,
    /// Body arrived but could not be turned into a snapshot.
    ParseFailed,
}

pub struct FetchScheduler {
    config: AppConfig,
    last_fetch: Option<Duration>,
    buffer: ResponseBuffer,
}

impl FetchScheduler {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            last_fetch: None,
            buffer: ResponseBuffer::new(),
        }
    }

    /// Run one scheduling pass at monotonic time `now`.
    ///
    /// A due fetch stamps `now` as the window start whatever its outcome;
    /// a failed attempt waits for the next window rather than retrying.
    pub fn maybe_fetch(
        &mut self,
        now: Duration,
        wifi: &ConnectionManager,
        transport: &mut dyn HttpTransport,
        store: &WeatherStore,
    ) -> FetchOutcome {
        if !wifi.is_connected() {
            return FetchOutcome::NotConnected;
        }
        if let Some(last) = self.last_fetch {
            if now.saturating_sub(last) <= self.config.fetch_interval {
                return FetchOutcome::NotDue;
            }
        }
        self.last_fetch = Some(now);

        let result = self.fetch_once(transport);
        // Drained after every attempt so a failure cannot leave stale bytes.
        self.buffer.reset();
        match result {
            Ok(snapshot) => {
                info!(
                    "weather updated: {:.1} C, {}%, {} hPa",
                    snapshot.temperature_c, snapshot.humidity, snapshot.pressure_hpa
                );
                store.publish(snapshot);
                FetchOutcome::Updated
            }
            Err(e @ FetchError::Transport(_)) => {
                warn!("weather fetch failed: {e}");
                FetchOutcome::TransportFailed
            }
            Err(e @ FetchError::Parse(_)) => {
                warn!("weather fetch failed: {e}");
                FetchOutcome::ParseFailed
            }
        }
    }

    fn fetch_once(
        &mut self,
        transport: &mut dyn HttpTransport,
    ) -> Result<WeatherSnapshot, FetchError> {
        let url = weather::request_url(
            self.config.city,
            self.config.country_code,
            self.config.api_key,
        );
        debug!("requesting {}", url.chars().take(80).collect::<String>());

        let status = transport.get(
            &url,
            &[("Content-Type", "application/x-www-form-urlencoded")],
            &mut self.buffer,
        )?;
        if status != 200 {
            return Err(TransportError::Status(status).into());
        }

        let body = self.buffer.take_body();
        debug!(
            "weather body ({} bytes): {}",
            body.len(),
            String::from_utf8_lossy(&body)
        );
        let snapshot = weather::parse_snapshot(&body, self.config.local_time_offset_secs)?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wifi::{WifiControl, WifiEvent};

    const BODY: &str = r#"{
        "main": {"temp": 300.0, "temp_min": 299.0, "temp_max": 301.0,
                 "pressure": 1010, "humidity": 70},
        "visibility": 10000,
        "dt": 1734281446
    }"#;

    struct NullControl;

    impl WifiControl for NullControl {
        fn request_connect(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Canned transport that records how many requests it served.
    struct FakeTransport {
        status: u16,
        body: Vec<u8>,
        connection_error: bool,
        requests: u32,
        last_url: String,
        last_headers: Vec<(String, String)>,
    }

    impl FakeTransport {
        fn ok(body: &str) -> Self {
            Self {
                status: 200,
                body: body.as_bytes().to_vec(),
                connection_error: false,
                requests: 0,
                last_url: String::new(),
                last_headers: Vec::new(),
            }
        }
    }

    impl HttpTransport for FakeTransport {
        fn get(
            &mut self,
            url: &str,
            headers: &[(&str, &str)],
            sink: &mut ResponseBuffer,
        ) -> Result<u16, TransportError> {
            self.requests += 1;
            self.last_url = url.to_string();
            self.last_headers = headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            if self.connection_error {
                return Err(TransportError::Connection("connect refused".into()));
            }
            for chunk in self.body.chunks(64) {
                sink.append_chunk(chunk)?;
            }
            Ok(self.status)
        }
    }

    fn connected_manager() -> ConnectionManager {
        let mgr = ConnectionManager::new(3);
        mgr.handle_event(WifiEvent::Connected, &mut NullControl);
        mgr
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn never_fetches_while_disconnected() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = ConnectionManager::new(3);
        let mut transport = FakeTransport::ok(BODY);
        let store = WeatherStore::new();

        let outcome = sched.maybe_fetch(secs(1000), &wifi, &mut transport, &store);
        assert_eq!(outcome, FetchOutcome::NotConnected);
        assert_eq!(transport.requests, 0);
        assert!(store.latest().is_none());
    }

    #[test]
    fn first_eligible_call_fetches_immediately() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = connected_manager();
        let mut transport = FakeTransport::ok(BODY);
        let store = WeatherStore::new();

        let outcome = sched.maybe_fetch(secs(3), &wifi, &mut transport, &store);
        assert_eq!(outcome, FetchOutcome::Updated);
        assert_eq!(transport.requests, 1);
        let snap = store.latest().unwrap();
        assert!((snap.temperature_c - 26.85).abs() < 0.01);
        assert_eq!(snap.visibility_km, 10);
    }

    #[test]
    fn at_most_one_fetch_per_window() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = connected_manager();
        let mut transport = FakeTransport::ok(BODY);
        let store = WeatherStore::new();

        assert_eq!(
            sched.maybe_fetch(secs(10), &wifi, &mut transport, &store),
            FetchOutcome::Updated
        );
        // 5 s cadence within the same 300 s window.
        for t in (15..=310).step_by(5) {
            assert_eq!(
                sched.maybe_fetch(secs(t), &wifi, &mut transport, &store),
                FetchOutcome::NotDue
            );
        }
        assert_eq!(transport.requests, 1);
        // Strictly past the window boundary the next fetch goes out.
        assert_eq!(
            sched.maybe_fetch(secs(311), &wifi, &mut transport, &store),
            FetchOutcome::Updated
        );
        assert_eq!(transport.requests, 2);
    }

    #[test]
    fn sends_the_fixed_request_shape() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = connected_manager();
        let mut transport = FakeTransport::ok(BODY);
        let store = WeatherStore::new();

        sched.maybe_fetch(secs(1), &wifi, &mut transport, &store);
        assert!(transport.last_url.starts_with(
            "http://api.openweathermap.org/data/2.5/weather?q=Mumbai,IN&APPID="
        ));
        assert_eq!(
            transport.last_headers,
            vec![(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string()
            )]
        );
    }

    #[test]
    fn transport_failure_leaves_snapshot_unchanged() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = connected_manager();
        let store = WeatherStore::new();

        let mut transport = FakeTransport::ok(BODY);
        sched.maybe_fetch(secs(1), &wifi, &mut transport, &store);
        let before = store.latest();

        let mut failing = FakeTransport::ok(BODY);
        failing.connection_error = true;
        let outcome = sched.maybe_fetch(secs(1000), &wifi, &mut failing, &store);
        assert_eq!(outcome, FetchOutcome::TransportFailed);
        assert_eq!(store.latest(), before);
    }

    #[test]
    fn non_200_status_is_a_transport_failure() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = connected_manager();
        let store = WeatherStore::new();

        let mut transport = FakeTransport::ok("{\"cod\":401}");
        transport.status = 401;
        let outcome = sched.maybe_fetch(secs(1), &wifi, &mut transport, &store);
        assert_eq!(outcome, FetchOutcome::TransportFailed);
        assert!(store.latest().is_none());
    }

    #[test]
    fn parse_failure_leaves_snapshot_unchanged() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = connected_manager();
        let store = WeatherStore::new();

        let mut transport = FakeTransport::ok(BODY);
        sched.maybe_fetch(secs(1), &wifi, &mut transport, &store);
        let before = store.latest();

        let mut truncated = FakeTransport::ok(r#"{"dt": 5, "visibility": 100}"#);
        let outcome = sched.maybe_fetch(secs(1000), &wifi, &mut truncated, &store);
        assert_eq!(outcome, FetchOutcome::ParseFailed);
        assert_eq!(store.latest(), before);
    }

    #[test]
    fn failed_attempt_waits_for_the_next_window() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = connected_manager();
        let store = WeatherStore::new();

        let mut failing = FakeTransport::ok(BODY);
        failing.connection_error = true;
        assert_eq!(
            sched.maybe_fetch(secs(10), &wifi, &mut failing, &store),
            FetchOutcome::TransportFailed
        );
        // The failure consumed this window; no immediate retry.
        assert_eq!(
            sched.maybe_fetch(secs(20), &wifi, &mut failing, &store),
            FetchOutcome::NotDue
        );
        assert_eq!(failing.requests, 1);
    }

    #[test]
    fn disconnected_pass_does_not_consume_the_window() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = ConnectionManager::new(3);
        let mut transport = FakeTransport::ok(BODY);
        let store = WeatherStore::new();

        assert_eq!(
            sched.maybe_fetch(secs(10), &wifi, &mut transport, &store),
            FetchOutcome::NotConnected
        );
        // Once connected, the first pass fetches right away.
        wifi.handle_event(WifiEvent::Connected, &mut NullControl);
        assert_eq!(
            sched.maybe_fetch(secs(12), &wifi, &mut transport, &store),
            FetchOutcome::Updated
        );
    }

    #[test]
    fn oversized_body_is_rejected() {
        let mut sched = FetchScheduler::new(AppConfig::default());
        let wifi = connected_manager();
        let store = WeatherStore::new();

        let huge = "x".repeat(crate::config::MAX_RESPONSE_BYTES + 1);
        let mut transport = FakeTransport::ok(&huge);
        let outcome = sched.maybe_fetch(secs(1), &wifi, &mut transport, &store);
        assert_eq!(outcome, FetchOutcome::TransportFailed);
        assert!(store.latest().is_none());
    }
}
