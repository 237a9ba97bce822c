pub mod data_screen;
pub mod main_screen;

use crate::config::SCREEN_TRANSITION_MS;
use crate::gui::{Gui, RenderEngine, ScreenTransition};
use crate::state::WeatherStore;

/// Screens in rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveScreen {
    Main,
    Data,
}

impl ActiveScreen {
    pub fn toggled(self) -> ActiveScreen {
        match self {
            ActiveScreen::Main => ActiveScreen::Data,
            ActiveScreen::Data => ActiveScreen::Main,
        }
    }
}

/// Where a widget hangs on the screen; offsets are relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopMid,
    TopRight,
    LeftMid,
    Center,
    BottomMid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Title,
    Body,
    Small,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Label {
        text: String,
        anchor: Anchor,
        offset: (i32, i32),
        size: FontSize,
    },
    Led {
        anchor: Anchor,
        offset: (i32, i32),
        lit: bool,
    },
}

pub(crate) fn label(
    text: impl Into<String>,
    anchor: Anchor,
    offset: (i32, i32),
    size: FontSize,
) -> Widget {
    Widget::Label {
        text: text.into(),
        anchor,
        offset,
        size,
    }
}

/// Complete description of one screen, rebuilt from scratch on every
/// activation and handed to the render engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenContent {
    pub widgets: Vec<Widget>,
}

impl ScreenContent {
    pub fn push(&mut self, widget: Widget) {
        self.widgets.push(widget);
    }
}

/// Alternates the two screens on the sensor task's cadence.
pub struct ScreenRotation {
    active: ActiveScreen,
}

impl ScreenRotation {
    pub fn new() -> Self {
        Self {
            active: ActiveScreen::Main,
        }
    }

    pub fn active(&self) -> ActiveScreen {
        self.active
    }

    /// Toggle to the other screen and, once the engine is up, slide it in.
    ///
    /// The toggle happens even while the engine is still coming up; only
    /// the load is skipped then.
    pub fn advance<E: RenderEngine>(
        &mut self,
        gui: &Gui<E>,
        store: &WeatherStore,
    ) -> ActiveScreen {
        self.active = self.active.toggled();
        if gui.is_ready() {
            let (content, transition) = match self.active {
                ActiveScreen::Main => (main_screen::build(), ScreenTransition::SlideRight),
                ActiveScreen::Data => {
                    let snapshot = store.latest();
                    (
                        data_screen::build(snapshot.as_ref()),
                        ScreenTransition::SlideLeft,
                    )
                }
            };
            gui.load_screen(content, transition, SCREEN_TRANSITION_MS, 0);
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherSnapshot;
    use std::sync::{Arc, Mutex};

    type LoadRecord = (ScreenContent, ScreenTransition, u32, u32);

    #[derive(Clone, Default)]
    struct LoadLog(Arc<Mutex<Vec<LoadRecord>>>);

    impl LoadLog {
        fn records(&self) -> Vec<LoadRecord> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeEngine {
        log: LoadLog,
    }

    impl RenderEngine for FakeEngine {
        fn process_pending_work(&mut self) {}

        fn advance_time_base(&mut self, _ms: u32) {}

        fn load_screen(
            &mut self,
            content: ScreenContent,
            transition: ScreenTransition,
            duration_ms: u32,
            delay_ms: u32,
        ) {
            self.log
                .0
                .lock()
                .unwrap()
                .push((content, transition, duration_ms, delay_ms));
        }
    }

    fn gui_with_log() -> (Gui<FakeEngine>, LoadLog) {
        let log = LoadLog::default();
        let gui = Gui::new(FakeEngine { log: log.clone() });
        (gui, log)
    }

    #[test]
    fn toggling_alternates_strictly() {
        let mut screen = ActiveScreen::Main;
        for i in 0..6 {
            screen = screen.toggled();
            if i % 2 == 0 {
                assert_eq!(screen, ActiveScreen::Data);
            } else {
                assert_eq!(screen, ActiveScreen::Main);
            }
        }
    }

    #[test]
    fn no_load_before_the_engine_is_ready() {
        let (gui, log) = gui_with_log();
        let store = WeatherStore::new();
        let mut rotation = ScreenRotation::new();

        assert_eq!(rotation.advance(&gui, &store), ActiveScreen::Data);
        assert_eq!(rotation.advance(&gui, &store), ActiveScreen::Main);
        assert!(log.records().is_empty());

        gui.mark_ready();
        assert_eq!(rotation.advance(&gui, &store), ActiveScreen::Data);
        assert_eq!(log.records().len(), 1);
    }

    #[test]
    fn loads_slide_toward_the_entering_screen() {
        let (gui, log) = gui_with_log();
        let store = WeatherStore::new();
        let mut rotation = ScreenRotation::new();
        gui.mark_ready();

        rotation.advance(&gui, &store);
        rotation.advance(&gui, &store);
        let records = log.records();
        assert_eq!(records[0].1, ScreenTransition::SlideLeft);
        assert_eq!(records[1].1, ScreenTransition::SlideRight);
        assert!(records
            .iter()
            .all(|r| r.2 == SCREEN_TRANSITION_MS && r.3 == 0));
        // Entering Data shows the placeholder until a snapshot lands.
        assert_eq!(records[0].0, data_screen::build(None));
        assert_eq!(records[1].0, main_screen::build());
    }

    #[test]
    fn data_screen_rebuilds_from_the_latest_snapshot() {
        let (gui, log) = gui_with_log();
        let store = WeatherStore::new();
        let mut rotation = ScreenRotation::new();
        gui.mark_ready();

        store.publish(WeatherSnapshot {
            humidity: 55,
            ..Default::default()
        });
        rotation.advance(&gui, &store);
        let snap = store.latest().unwrap();
        assert_eq!(log.records()[0].0, data_screen::build(Some(&snap)));
    }
}
