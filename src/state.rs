//! Shared weather state.

use std::sync::RwLock;

use crate::weather::WeatherSnapshot;

/// Latest weather record, written by the fetch path and read by the GUI.
///
/// Whole-record replace under the write lock; readers get a clone, so a
/// fetch landing mid-render can never produce a torn record.
#[derive(Default)]
pub struct WeatherStore {
    slot: RwLock<Option<WeatherSnapshot>>,
}

impl WeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: WeatherSnapshot) {
        *self.slot.write().unwrap() = Some(snapshot);
    }

    pub fn latest(&self) -> Option<WeatherSnapshot> {
        self.slot.read().unwrap().clone()
    }

    pub fn has_data(&self) -> bool {
        self.slot.read().unwrap().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = WeatherStore::new();
        assert!(store.latest().is_none());
        assert!(!store.has_data());
    }

    #[test]
    fn publish_replaces_the_whole_record() {
        let store = WeatherStore::new();
        store.publish(WeatherSnapshot {
            temperature_c: 21.0,
            ..Default::default()
        });
        store.publish(WeatherSnapshot {
            temperature_c: 24.5,
            humidity: 60,
            ..Default::default()
        });
        let snap = store.latest().unwrap();
        assert_eq!(snap.temperature_c, 24.5);
        assert_eq!(snap.humidity, 60);
        assert!(store.has_data());
    }
}
