//! OpenWeatherMap payload handling: response DTOs, unit conversions, and
//! the local-time string shown on the data screen.

use serde::Deserialize;

use crate::error::ParseError;

const OWM_ENDPOINT: &str = "http://api.openweathermap.org/data/2.5/weather";

// ── Data types ──────────────────────────────────────────────────────

/// Latest parsed weather record.
///
/// Built whole from one response and published to the store as a single
/// replace; readers never see a partially updated record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    pub timestamp_utc: i64,
    pub temperature_c: f32,
    pub temp_min_c: f32,
    pub temp_max_c: f32,
    pub humidity: u8,
    pub pressure_hpa: u32,
    pub visibility_km: u32,
    pub local_time: String,
}

// ── OWM JSON structures ─────────────────────────────────────────────

#[derive(Deserialize)]
struct OwmRoot {
    dt: Option<i64>,
    main: Option<OwmMain>,
    visibility: Option<u32>,
}

#[derive(Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<u32>,
    humidity: Option<u8>,
}

// ── Conversions ─────────────────────────────────────────────────────

pub fn kelvin_to_celsius(kelvin: f64) -> f32 {
    (kelvin - 273.15) as f32
}

/// Truncating, matching the display's whole-kilometer readout.
pub fn meters_to_km(meters: u32) -> u32 {
    meters / 1000
}

/// Format `epoch_utc` shifted by the fixed local offset as
/// `DD/MM/YYYY - HH:MM AM|PM`.
pub fn format_local_time(epoch_utc: i64, offset_secs: i64) -> String {
    let local_epoch = (epoch_utc + offset_secs) as libc::time_t;
    let mut tm: libc::tm = unsafe { core::mem::zeroed() };
    unsafe {
        libc::gmtime_r(&local_epoch, &mut tm);
    }
    let hour12 = if tm.tm_hour % 12 == 0 {
        12
    } else {
        tm.tm_hour % 12
    };
    let ampm = if tm.tm_hour >= 12 { "PM" } else { "AM" };
    format!(
        "{:02}/{:02}/{:04} - {:02}:{:02} {}",
        tm.tm_mday,
        tm.tm_mon + 1,
        tm.tm_year + 1900,
        hour12,
        tm.tm_min,
        ampm
    )
}

// ── Request building ────────────────────────────────────────────────

/// Current-weather URL for a fixed city. No `units` parameter; the API
/// answers in Kelvin and the conversion happens on-device.
pub fn request_url(city: &str, country_code: &str, api_key: &str) -> String {
    format!("{OWM_ENDPOINT}?q={city},{country_code}&APPID={api_key}")
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse a response body into a snapshot.
///
/// Every field extraction is fallible: an absent field comes back as
/// `ParseError::MissingField`, never a panic.
pub fn parse_snapshot(body: &[u8], offset_secs: i64) -> Result<WeatherSnapshot, ParseError> {
    let text = std::str::from_utf8(body).map_err(|_| ParseError::InvalidUtf8)?;
    let root: OwmRoot = serde_json::from_str(text)?;

    let dt = root.dt.ok_or(ParseError::MissingField("dt"))?;
    let main = root.main.ok_or(ParseError::MissingField("main"))?;
    let temp = main.temp.ok_or(ParseError::MissingField("main.temp"))?;
    let temp_min = main
        .temp_min
        .ok_or(ParseError::MissingField("main.temp_min"))?;
    let temp_max = main
        .temp_max
        .ok_or(ParseError::MissingField("main.temp_max"))?;
    let humidity = main
        .humidity
        .ok_or(ParseError::MissingField("main.humidity"))?;
    let pressure = main
        .pressure
        .ok_or(ParseError::MissingField("main.pressure"))?;
    let visibility = root
        .visibility
        .ok_or(ParseError::MissingField("visibility"))?;

    Ok(WeatherSnapshot {
        timestamp_utc: dt,
        temperature_c: kelvin_to_celsius(temp),
        temp_min_c: kelvin_to_celsius(temp_min),
        temp_max_c: kelvin_to_celsius(temp_max),
        humidity,
        pressure_hpa: pressure,
        visibility_km: meters_to_km(visibility),
        local_time: format_local_time(dt, offset_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coord": {"lon": 72.8479, "lat": 19.0144},
        "weather": [{"id": 721, "main": "Haze", "description": "haze", "icon": "50n"}],
        "base": "stations",
        "main": {"temp": 297.14, "feels_like": 297.88, "temp_min": 296.15,
                 "temp_max": 298.15, "pressure": 1013, "humidity": 78},
        "visibility": 3000,
        "wind": {"speed": 2.57, "deg": 330},
        "clouds": {"all": 20},
        "dt": 1734281446,
        "sys": {"country": "IN", "sunrise": 1734226670, "sunset": 1734266377},
        "timezone": 19800,
        "id": 1275339,
        "name": "Mumbai",
        "cod": 200
    }"#;

    #[test]
    fn kelvin_conversion() {
        assert!((kelvin_to_celsius(300.0) - 26.85).abs() < 0.01);
        assert!((kelvin_to_celsius(273.15)).abs() < 0.01);
    }

    #[test]
    fn visibility_truncates_to_whole_km() {
        assert_eq!(meters_to_km(10000), 10);
        assert_eq!(meters_to_km(9999), 9);
        assert_eq!(meters_to_km(999), 0);
    }

    #[test]
    fn local_time_at_offset_530() {
        assert_eq!(
            format_local_time(1734281446, 19800),
            "15/12/2024 - 10:20 PM"
        );
    }

    #[test]
    fn twelve_hour_boundaries() {
        // 1734220800 is 15/12/2024 00:00 UTC.
        assert_eq!(format_local_time(1734220800, 0), "15/12/2024 - 12:00 AM");
        assert_eq!(
            format_local_time(1734220800 + 43_200, 0),
            "15/12/2024 - 12:00 PM"
        );
        assert_eq!(
            format_local_time(1734220800 + 3_600, 0),
            "15/12/2024 - 01:00 AM"
        );
    }

    #[test]
    fn offset_rolls_the_date_over() {
        // 31/12/2024 18:30 UTC is already new year's day at +5:30.
        assert_eq!(
            format_local_time(1735669800, 19800),
            "01/01/2025 - 12:00 AM"
        );
    }

    #[test]
    fn parses_a_full_response() {
        let snap = parse_snapshot(SAMPLE.as_bytes(), 19800).unwrap();
        assert_eq!(snap.timestamp_utc, 1734281446);
        assert!((snap.temperature_c - 23.99).abs() < 0.01);
        assert!((snap.temp_min_c - 23.00).abs() < 0.01);
        assert!((snap.temp_max_c - 25.00).abs() < 0.01);
        assert_eq!(snap.humidity, 78);
        assert_eq!(snap.pressure_hpa, 1013);
        assert_eq!(snap.visibility_km, 3);
        assert_eq!(snap.local_time, "15/12/2024 - 10:20 PM");
    }

    #[test]
    fn missing_fields_are_typed_errors() {
        let no_main = r#"{"dt": 1734281446, "visibility": 3000}"#;
        assert!(matches!(
            parse_snapshot(no_main.as_bytes(), 0),
            Err(ParseError::MissingField("main"))
        ));

        let no_temp_min = r#"{"dt": 1734281446, "visibility": 3000,
            "main": {"temp": 297.0, "temp_max": 298.0, "pressure": 1013, "humidity": 78}}"#;
        assert!(matches!(
            parse_snapshot(no_temp_min.as_bytes(), 0),
            Err(ParseError::MissingField("main.temp_min"))
        ));
    }

    #[test]
    fn malformed_bodies_do_not_panic() {
        assert!(matches!(
            parse_snapshot(&[0xff, 0xfe], 0),
            Err(ParseError::InvalidUtf8)
        ));
        assert!(matches!(
            parse_snapshot(b"not json", 0),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn builds_the_query_url() {
        assert_eq!(
            request_url("Mumbai", "IN", "abc123"),
            "http://api.openweathermap.org/data/2.5/weather?q=Mumbai,IN&APPID=abc123"
        );
    }
}
