//! Frame driving: the tick gate, the stoppable frame loop, and the
//! `GlowAnimation` that ties layout, scheduling and rendering together.
//!
//! Everything here is single-threaded. The scheduler finishes its update
//! before the render adapter sees the markers, so a render never observes a
//! half-updated set.

use crate::config::{AvoidRect, GlowConfig};
use crate::marker::Marker;
use crate::positions;
use crate::scheduler::CycleScheduler;
use rand::prelude::*;
use std::time::Duration;

/// Presentation target for the markers. Called once per admitted frame,
/// after the scheduler update. Implementations must treat `brightness` as
/// opacity and may skip unlit markers.
pub trait Render {
    fn render(&mut self, markers: &[Marker]);
}

impl<F: FnMut(&[Marker])> Render for F {
    fn render(&mut self, markers: &[Marker]) {
        self(markers)
    }
}

/// Minimum-interval gate for frame callbacks. Callbacks that arrive early
/// are dropped and their time carries into the next admitted tick.
#[derive(Clone, Debug)]
pub struct TickGate {
    min_interval_ms: f64,
    last_ms: Option<f64>,
}

impl TickGate {
    pub fn new(max_fps: f32) -> Self {
        let fps = if max_fps.is_finite() && max_fps > 0.0 {
            max_fps as f64
        } else {
            crate::constants::DEFAULT_MAX_FPS as f64
        };
        Self {
            min_interval_ms: 1000.0 / fps,
            last_ms: None,
        }
    }

    /// Returns the elapsed time since the last admitted tick, or `None`
    /// when the callback arrived too soon. The first call admits a zero
    /// delta.
    pub fn admit(&mut self, now_ms: f64) -> Option<Duration> {
        if !now_ms.is_finite() {
            return None;
        }
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return Some(Duration::ZERO);
        };
        let elapsed = now_ms - last;
        if elapsed < 0.0 {
            // clock went backwards; rebase without ticking
            self.last_ms = Some(now_ms);
            return None;
        }
        // 0.5ms tolerance for display timer jitter
        if elapsed + 0.5 < self.min_interval_ms {
            return None;
        }
        self.last_ms = Some(now_ms);
        Some(Duration::from_secs_f64(elapsed / 1000.0))
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_secs_f64(self.min_interval_ms / 1000.0)
    }
}

/// Host facility that schedules one frame callback at a time, such as
/// `requestAnimationFrame`.
pub trait FrameRequester {
    type Handle: Copy;
    fn request_frame(&mut self) -> Option<Self::Handle>;
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Owns at most one pending frame request and guarantees that nothing is
/// scheduled after `stop`.
pub struct FrameLoop<R: FrameRequester> {
    requester: R,
    pending: Option<R::Handle>,
    stopped: bool,
}

impl<R: FrameRequester> FrameLoop<R> {
    pub fn new(requester: R) -> Self {
        Self {
            requester,
            pending: None,
            stopped: false,
        }
    }

    pub fn start(&mut self) {
        self.schedule_next();
    }

    /// Record that the pending callback fired. Returns false once stopped,
    /// in which case the caller must not run the frame.
    pub fn on_frame(&mut self) -> bool {
        self.pending = None;
        !self.stopped
    }

    pub fn schedule_next(&mut self) {
        if self.stopped || self.pending.is_some() {
            return;
        }
        self.pending = self.requester.request_frame();
    }

    /// Cancel the pending request and refuse further scheduling. Calling
    /// this more than once has no further effect.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Some(handle) = self.pending.take() {
            self.requester.cancel_frame(handle);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn requester(&self) -> &R {
        &self.requester
    }

    pub fn requester_mut(&mut self) -> &mut R {
        &mut self.requester
    }
}

/// A mounted glow effect: marker set, scheduler and frame gate.
pub struct GlowAnimation {
    config: GlowConfig,
    scheduler: CycleScheduler,
    gate: TickGate,
    generation: u64,
}

impl GlowAnimation {
    pub fn new(config: GlowConfig) -> Self {
        let config = config.sanitized();
        let scheduler = build_scheduler(&config);
        log::info!(
            "[glow] mounted {} layout with {} markers (active {}-{})",
            config.layout.mode_name(),
            scheduler.markers().len(),
            config.active_count.min,
            config.active_count.max
        );
        Self {
            gate: TickGate::new(config.max_fps),
            config,
            scheduler,
            generation: 0,
        }
    }

    /// Run one frame callback: gate, update, then render. Returns whether
    /// the frame was admitted.
    pub fn frame<R: Render + ?Sized>(&mut self, now_ms: f64, render: &mut R) -> bool {
        let Some(dt) = self.gate.admit(now_ms) else {
            return false;
        };
        self.scheduler.tick(dt);
        render.render(self.scheduler.markers());
        true
    }

    /// Advance without the gate or a renderer.
    pub fn tick(&mut self, dt: Duration) {
        self.scheduler.tick(dt);
    }

    /// Discard every marker and any in-flight handoff, then start again from
    /// a fresh layout at `phase = 0`.
    pub fn remount(&mut self, config: GlowConfig) {
        self.config = config.sanitized();
        self.scheduler = build_scheduler(&self.config);
        self.gate = TickGate::new(self.config.max_fps);
        self.generation += 1;
        log::info!(
            "[glow] remount #{}: {} markers",
            self.generation,
            self.scheduler.markers().len()
        );
    }

    /// Viewport size changed. `avoid`, when given, replaces the avoid
    /// rectangles with ones measured against the new page layout. Grid
    /// layouts remount only when the fitted grid or the rectangles differ;
    /// scatter positions are viewport-relative and keep running. Returns
    /// whether a remount happened.
    pub fn resize(
        &mut self,
        width_px: f32,
        height_px: f32,
        avoid: Option<Vec<AvoidRect>>,
    ) -> bool {
        if !self.config.layout.is_grid() {
            return false;
        }
        let mut config = self.config.clone();
        config.fit_to_viewport(width_px, height_px);
        if let Some(rects) = avoid {
            config.set_avoid_rects(rects);
        }
        let config = config.sanitized();
        if config == self.config {
            return false;
        }
        self.remount(config);
        true
    }

    pub fn scheduler(&self) -> &CycleScheduler {
        &self.scheduler
    }

    pub fn markers(&self) -> &[Marker] {
        self.scheduler.markers()
    }

    pub fn config(&self) -> &GlowConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn build_scheduler(config: &GlowConfig) -> CycleScheduler {
    // layout and set selection use separate seeded streams
    let mut layout_rng = StdRng::seed_from_u64(config.seed);
    let markers = positions::generate(config, &mut layout_rng);
    let schedule_rng = StdRng::seed_from_u64(config.seed ^ 0x9E37_79B9_7F4A_7C15);
    CycleScheduler::new(markers, config, schedule_rng)
}
