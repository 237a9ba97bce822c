//! GUI lock shell.
//!
//! Every call into the render engine goes through [`Gui`], which wraps the
//! engine in the one mutex the whole firmware shares. The tick source is
//! the exception: it only bumps an atomic counter, and the accumulated
//! ticks are drained into the engine on the next locked pass.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use crate::views::ScreenContent;

/// Direction of the slide animation between screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTransition {
    SlideLeft,
    SlideRight,
}

/// Rendering collaborator driven by the loops in `main`.
///
/// Implementations are single-threaded; all calls arrive with the GUI lock
/// held.
pub trait RenderEngine {
    /// Run one animation/redraw step.
    fn process_pending_work(&mut self);

    /// Advance the engine's logical clock by `ms`.
    fn advance_time_base(&mut self, ms: u32);

    /// Replace the visible screen with `content`, sliding in over
    /// `duration_ms` after `delay_ms`.
    fn load_screen(
        &mut self,
        content: ScreenContent,
        transition: ScreenTransition,
        duration_ms: u32,
        delay_ms: u32,
    );
}

/// The engine behind the GUI lock, plus the tick accumulator that keeps
/// the timer callback out of that lock.
pub struct Gui<E> {
    engine: Mutex<E>,
    pending_ticks: AtomicU32,
    ready: AtomicBool,
}

impl<E: RenderEngine> Gui<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Mutex::new(engine),
            pending_ticks: AtomicU32::new(0),
            ready: AtomicBool::new(false),
        }
    }

    /// Record `ms` of elapsed time. Safe from any context; never blocks.
    pub fn tick(&self, ms: u32) {
        // The mutex orders engine access; the counter only carries a count.
        self.pending_ticks.fetch_add(ms, Ordering::Relaxed);
    }

    /// One render pass: drain accumulated ticks into the engine, then run
    /// its pending work. Called every `RENDER_PERIOD_MS` by the GUI task.
    pub fn process(&self) {
        let mut engine = self.engine.lock().unwrap();
        let ticks = self.pending_ticks.swap(0, Ordering::Relaxed);
        if ticks > 0 {
            engine.advance_time_base(ticks);
        }
        engine.process_pending_work();
    }

    pub fn load_screen(
        &self,
        content: ScreenContent,
        transition: ScreenTransition,
        duration_ms: u32,
        delay_ms: u32,
    ) {
        self.engine
            .lock()
            .unwrap()
            .load_screen(content, transition, duration_ms, delay_ms);
    }

    /// Flag the engine as fully brought up; screen loads are held back
    /// until this is set.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Relaxed);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }
}
