//! Station connection state machine.
//!
//! The manager owns the retry budget and the link state; the radio itself
//! stays behind the [`WifiControl`] seam so the same policy drives both the
//! ESP-IDF driver and the fakes used in tests. Driver callbacks feed
//! [`WifiEvent`]s in (possibly from a foreign thread); the manager decides
//! whether to issue another connect request.

use std::net::Ipv4Addr;
use std::sync::Mutex;

use log::{info, warn};

/// Lifecycle of the station link, as seen by the rest of the firmware.
///
/// The fetch scheduler gates on `Connected`; everything else only logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Driver notifications the manager reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiEvent {
    StationStarted,
    Connected,
    Disconnected,
    IpAcquired(Ipv4Addr),
}

/// Issues an asynchronous connect request to the underlying radio.
pub trait WifiControl {
    fn request_connect(&mut self) -> anyhow::Result<()>;
}

struct Inner {
    state: ConnectionState,
    retries: u32,
}

/// Retry-bounded reconnection policy shared between the event callback and
/// the main loop. All state sits behind one mutex with short hold times.
pub struct ConnectionManager {
    max_retries: u32,
    inner: Mutex<Inner>,
}

enum Directive {
    Stay,
    Connect,
}

impl ConnectionManager {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            inner: Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                retries: 0,
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.lock().unwrap().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn retries(&self) -> u32 {
        self.inner.lock().unwrap().retries
    }

    /// Mark the link as coming up once a connect request has been issued.
    pub fn mark_connecting(&self) {
        self.inner.lock().unwrap().state = ConnectionState::Connecting;
    }

    /// Apply one driver event, issuing a reconnect request where the policy
    /// calls for it.
    ///
    /// A reconnect consumes one retry even when the request call errors; the
    /// driver reports the outcome through a later event either way.
    pub fn handle_event(&self, event: WifiEvent, control: &mut dyn WifiControl) {
        let directive = {
            let mut inner = self.inner.lock().unwrap();
            self.apply(&mut inner, event)
        };
        // Lock released before touching the radio.
        if let Directive::Connect = directive {
            if let Err(e) = control.request_connect() {
                warn!("reconnect request failed: {e}");
            }
        }
    }

    fn apply(&self, inner: &mut Inner, event: WifiEvent) -> Directive {
        match event {
            WifiEvent::StationStarted => {
                info!("station started");
                Directive::Stay
            }
            WifiEvent::Connected => {
                info!("connected to the AP");
                inner.state = ConnectionState::Connected;
                inner.retries = 0;
                Directive::Stay
            }
            WifiEvent::Disconnected => {
                inner.state = ConnectionState::Disconnected;
                if inner.retries < self.max_retries {
                    inner.retries += 1;
                    warn!(
                        "disconnected, retrying ({}/{})",
                        inner.retries, self.max_retries
                    );
                    Directive::Connect
                } else {
                    warn!("could not connect after {} attempts", self.max_retries);
                    Directive::Stay
                }
            }
            WifiEvent::IpAcquired(ip) => {
                info!("got ip: {ip}");
                Directive::Stay
            }
        }
    }
}
