//! Immediate-mode render engine over the PSRAM framebuffer.
//!
//! Screens arrive as widget descriptions from the core; this engine lays
//! them out, steps the slide animation on the tick clock, and flushes the
//! composed frame to the panel when something changed.

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use profont::{PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

use weather_panel::gui::{RenderEngine, ScreenTransition};
use weather_panel::views::{Anchor, FontSize, ScreenContent, Widget};

use super::framebuffer::Framebuffer;
use super::panel::Panel;

const LED_DIAMETER: u32 = 12;

enum Slide {
    None,
    Active {
        incoming: ScreenContent,
        kind: ScreenTransition,
        duration_ms: u32,
        delay_ms: u32,
        elapsed_ms: u32,
    },
}

pub struct FramebufferEngine {
    fb: Framebuffer,
    panel: Panel,
    current: ScreenContent,
    slide: Slide,
    dirty: bool,
}

impl FramebufferEngine {
    pub fn new(fb: Framebuffer, panel: Panel) -> Self {
        Self {
            fb,
            panel,
            current: ScreenContent::default(),
            slide: Slide::None,
            dirty: true,
        }
    }
}

impl RenderEngine for FramebufferEngine {
    fn process_pending_work(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let width = self.fb.size().width as i32;
        self.fb.clear_color(rgb(16, 20, 28));

        let mut finished = false;
        match &self.slide {
            Slide::None => {
                draw_content(&mut self.fb, &self.current, 0);
            }
            Slide::Active {
                incoming,
                kind,
                duration_ms,
                delay_ms,
                elapsed_ms,
            } => {
                if *elapsed_ms < *delay_ms {
                    draw_content(&mut self.fb, &self.current, 0);
                } else {
                    let run = (*elapsed_ms - *delay_ms).min(*duration_ms);
                    let offset = if *duration_ms == 0 {
                        width
                    } else {
                        (width as i64 * run as i64 / *duration_ms as i64) as i32
                    };
                    // Both screens move together, the incoming one trailing
                    // in from the edge the slide points away from.
                    let (cur_dx, in_dx) = match kind {
                        ScreenTransition::SlideLeft => (-offset, width - offset),
                        ScreenTransition::SlideRight => (offset, offset - width),
                    };
                    draw_content(&mut self.fb, &self.current, cur_dx);
                    draw_content(&mut self.fb, incoming, in_dx);
                    finished = run >= *duration_ms;
                }
            }
        }

        if finished {
            if let Slide::Active { incoming, .. } = std::mem::replace(&mut self.slide, Slide::None)
            {
                self.current = incoming;
            }
        }

        self.fb.flush_to_panel(self.panel.panel);
    }

    fn advance_time_base(&mut self, ms: u32) {
        if let Slide::Active { elapsed_ms, .. } = &mut self.slide {
            *elapsed_ms = elapsed_ms.saturating_add(ms);
            self.dirty = true;
        }
    }

    fn load_screen(
        &mut self,
        content: ScreenContent,
        transition: ScreenTransition,
        duration_ms: u32,
        delay_ms: u32,
    ) {
        self.slide = Slide::Active {
            incoming: content,
            kind: transition,
            duration_ms,
            delay_ms,
            elapsed_ms: 0,
        };
        self.dirty = true;
    }
}

// ── Layout ──────────────────────────────────────────────────────────

fn rgb(r: u8, g: u8, b: u8) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

fn font_for(size: FontSize) -> &'static MonoFont<'static> {
    match size {
        FontSize::Title => &PROFONT_24_POINT,
        FontSize::Body => &PROFONT_18_POINT,
        FontSize::Small => &PROFONT_14_POINT,
    }
}

fn place(fb: &Framebuffer, anchor: Anchor, offset: (i32, i32)) -> (Point, Alignment, Baseline) {
    let w = fb.size().width as i32;
    let h = fb.size().height as i32;
    let (ax, ay, alignment, baseline) = match anchor {
        Anchor::TopLeft => (0, 0, Alignment::Left, Baseline::Top),
        Anchor::TopMid => (w / 2, 0, Alignment::Center, Baseline::Top),
        Anchor::TopRight => (w, 0, Alignment::Right, Baseline::Top),
        Anchor::LeftMid => (0, h / 2, Alignment::Left, Baseline::Middle),
        Anchor::Center => (w / 2, h / 2, Alignment::Center, Baseline::Middle),
        Anchor::BottomMid => (w / 2, h, Alignment::Center, Baseline::Bottom),
    };
    (
        Point::new(ax + offset.0, ay + offset.1),
        alignment,
        baseline,
    )
}

fn draw_content(fb: &mut Framebuffer, content: &ScreenContent, dx: i32) {
    for widget in &content.widgets {
        match widget {
            Widget::Label {
                text,
                anchor,
                offset,
                size,
            } => {
                let (point, alignment, baseline) = place(fb, *anchor, *offset);
                let char_style = MonoTextStyle::new(font_for(*size), rgb(235, 235, 235));
                let text_style = TextStyleBuilder::new()
                    .alignment(alignment)
                    .baseline(baseline)
                    .build();
                Text::with_text_style(
                    text,
                    Point::new(point.x + dx, point.y),
                    char_style,
                    text_style,
                )
                .draw(fb)
                .ok();
            }
            Widget::Led {
                anchor,
                offset,
                lit,
            } => {
                let (point, _, _) = place(fb, *anchor, *offset);
                let color = if *lit {
                    rgb(80, 220, 120)
                } else {
                    rgb(70, 78, 90)
                };
                Circle::with_center(Point::new(point.x + dx, point.y), LED_DIAMETER)
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(fb)
                    .ok();
            }
        }
    }
}
