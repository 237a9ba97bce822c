//! Live weather readout screen.

use super::{label, Anchor, FontSize, ScreenContent, Widget};
use crate::config;
use crate::weather::WeatherSnapshot;

const HEADING: &str = "Current Weather";
const PLACEHOLDER: &str = "Waiting for weather data...";

/// Build the data screen from the latest snapshot, or the placeholder
/// when none has arrived yet. The indicator LED mirrors snapshot presence.
pub fn build(snapshot: Option<&WeatherSnapshot>) -> ScreenContent {
    let mut content = ScreenContent::default();
    content.push(label(HEADING, Anchor::TopMid, (0, 8), FontSize::Title));
    content.push(label(
        format!("{}, {}", config::CITY, config::COUNTRY_CODE),
        Anchor::TopMid,
        (0, 42),
        FontSize::Body,
    ));
    content.push(Widget::Led {
        anchor: Anchor::TopRight,
        offset: (-14, 14),
        lit: snapshot.is_some(),
    });

    match snapshot {
        Some(snap) => {
            content.push(label(
                snap.local_time.clone(),
                Anchor::TopMid,
                (0, 66),
                FontSize::Small,
            ));
            content.push(label(
                format!(
                    "Temp: {:.1} C  ({:.1} / {:.1})",
                    snap.temperature_c, snap.temp_min_c, snap.temp_max_c
                ),
                Anchor::LeftMid,
                (12, -30),
                FontSize::Body,
            ));
            content.push(label(
                format!("Humidity: {} %", snap.humidity),
                Anchor::LeftMid,
                (12, -6),
                FontSize::Body,
            ));
            content.push(label(
                format!("Pressure: {} hPa", snap.pressure_hpa),
                Anchor::LeftMid,
                (12, 18),
                FontSize::Body,
            ));
            content.push(label(
                format!("Visibility: {} km", snap.visibility_km),
                Anchor::LeftMid,
                (12, 42),
                FontSize::Body,
            ));
        }
        None => {
            content.push(label(PLACEHOLDER, Anchor::Center, (0, 0), FontSize::Body));
        }
    }
    content
}
