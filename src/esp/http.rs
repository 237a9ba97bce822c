//! HTTP transport adapter over the ESP-IDF client.

use std::time::Duration;

use embedded_svc::io::Read;
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use log::debug;

use weather_panel::config::HTTP_TIMEOUT_MS;
use weather_panel::error::TransportError;
use weather_panel::http::{HttpTransport, ResponseBuffer};

/// Blocking GET over a fresh connection per request.
pub struct EspTransport;

impl HttpTransport for EspTransport {
    fn get(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        sink: &mut ResponseBuffer,
    ) -> Result<u16, TransportError> {
        let config = Configuration {
            timeout: Some(Duration::from_millis(HTTP_TIMEOUT_MS)),
            ..Default::default()
        };

        let connection = EspHttpConnection::new(&config)
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        use embedded_svc::http::client::Client;
        use embedded_svc::http::Method;
        let mut client = Client::wrap(connection);

        let mut response = client
            .request(Method::Get, url, headers)
            .map_err(|e| TransportError::Connection(e.to_string()))?
            .submit()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        debug!(
            "HTTP GET {} -> status {}",
            url.chars().take(80).collect::<String>(),
            status
        );

        let mut buf = [0u8; 1024];
        loop {
            let n = response
                .read(&mut buf)
                .map_err(|e| TransportError::Connection(e.to_string()))?;
            if n == 0 {
                break;
            }
            sink.append_chunk(&buf[..n])?;
        }

        Ok(status)
    }
}
