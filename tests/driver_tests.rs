// Host-side tests for the tick gate, the stoppable frame loop and the
// mounted animation.

use glow_core::*;
use std::time::Duration;

#[derive(Default)]
struct FakeRequester {
    next_handle: u32,
    requested: Vec<u32>,
    cancelled: Vec<u32>,
}

impl FrameRequester for FakeRequester {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        self.next_handle += 1;
        self.requested.push(self.next_handle);
        Some(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.cancelled.push(handle);
    }
}

#[test]
fn gate_admits_first_frame_with_zero_delta() {
    let mut gate = TickGate::new(30.0);
    assert_eq!(gate.admit(1000.0), Some(Duration::ZERO));
}

#[test]
fn gate_coalesces_early_frames() {
    let mut gate = TickGate::new(30.0);
    gate.admit(0.0);
    assert_eq!(gate.admit(10.0), None);
    assert_eq!(gate.admit(20.0), None);
    // the skipped time is carried into the admitted tick
    let dt = gate.admit(40.0).expect("frame after the interval is admitted");
    assert!((dt.as_secs_f64() - 0.040).abs() < 1e-9);
    assert_eq!(gate.admit(50.0), None);
}

#[test]
fn gate_tolerates_display_jitter_at_the_cap() {
    let mut gate = TickGate::new(60.0);
    gate.admit(0.0);
    assert!(gate.admit(16.5).is_some());
}

#[test]
fn gate_rebases_when_the_clock_goes_backwards() {
    let mut gate = TickGate::new(30.0);
    gate.admit(500.0);
    assert_eq!(gate.admit(100.0), None);
    assert!(gate.admit(140.0).is_some());
    assert_eq!(gate.admit(f64::NAN), None);
}

#[test]
fn gate_falls_back_to_default_rate_for_bad_fps() {
    let gate = TickGate::new(0.0);
    let expected = Duration::from_secs_f64(1.0 / DEFAULT_MAX_FPS as f64);
    assert!((gate.min_interval().as_secs_f64() - expected.as_secs_f64()).abs() < 1e-9);
}

#[test]
fn frame_loop_keeps_at_most_one_request_pending() {
    let mut fl = FrameLoop::new(FakeRequester::default());
    fl.start();
    fl.schedule_next();
    assert_eq!(fl.requester().requested.len(), 1);
    assert!(fl.on_frame());
    assert!(!fl.has_pending());
    fl.schedule_next();
    assert_eq!(fl.requester().requested.len(), 2);
}

#[test]
fn stop_cancels_pending_frame_and_blocks_rescheduling() {
    let mut fl = FrameLoop::new(FakeRequester::default());
    fl.start();
    fl.stop();
    assert!(fl.is_stopped());
    assert_eq!(fl.requester().cancelled, vec![1]);
    fl.schedule_next();
    fl.start();
    assert_eq!(fl.requester().requested.len(), 1);
    // a callback that was already in flight must not run the frame
    assert!(!fl.on_frame());
}

#[test]
fn stopping_twice_is_the_same_as_stopping_once() {
    let mut once = FrameLoop::new(FakeRequester::default());
    once.start();
    once.stop();

    let mut twice = FrameLoop::new(FakeRequester::default());
    twice.start();
    twice.stop();
    twice.stop();

    assert_eq!(once.requester().cancelled, twice.requester().cancelled);
    assert_eq!(once.is_stopped(), twice.is_stopped());
    assert_eq!(once.has_pending(), twice.has_pending());
}

#[test]
fn stop_without_pending_frame_cancels_nothing() {
    let mut fl = FrameLoop::new(FakeRequester::default());
    fl.start();
    assert!(fl.on_frame());
    fl.stop();
    assert!(fl.requester().cancelled.is_empty());
}

#[test]
fn frame_updates_before_rendering() {
    let mut anim = GlowAnimation::new(Preset::Grid.config());
    let mut seen: Vec<Vec<f32>> = Vec::new();
    let mut now = 0.0;
    for _ in 0..60 {
        now += 40.0;
        let mut render = |markers: &[Marker]| {
            seen.push(markers.iter().map(|m| m.brightness()).collect());
        };
        assert!(anim.frame(now, &mut render));
        let live: Vec<f32> = anim.markers().iter().map(|m| m.brightness()).collect();
        assert_eq!(seen.last(), Some(&live));
    }
    assert_eq!(seen.len(), 60);
}

#[test]
fn gated_frames_do_not_render() {
    let mut anim = GlowAnimation::new(Preset::Grid.config());
    let mut renders = 0;
    let mut render = |_: &[Marker]| renders += 1;
    assert!(anim.frame(0.0, &mut render));
    assert!(!anim.frame(5.0, &mut render));
    assert!(!anim.frame(10.0, &mut render));
    assert!(anim.frame(40.0, &mut render));
    assert_eq!(renders, 2);
}

#[test]
fn remount_mid_handoff_restarts_cleanly() {
    let mut anim = GlowAnimation::new(Preset::Grid.config());
    while anim.scheduler().mode() != CycleMode::HandingOff {
        anim.tick(Duration::from_millis(16));
    }
    let config = anim.config().clone();
    anim.remount(config);
    let s = anim.scheduler();
    assert_eq!(anim.generation(), 1);
    assert_eq!(s.mode(), CycleMode::Breathing);
    assert_eq!(s.phase(), 0.0);
    assert_eq!(s.transition_progress(), 0.0);
    assert!(s.next_set().is_empty());
    assert_eq!(s.count_in(MarkerState::Transitioning), 0);
    assert_eq!(s.cycles_completed(), 0);
}

#[test]
fn resize_regenerates_grid_layouts_only() {
    let mut grid = GlowAnimation::new(Preset::Framed.config());
    assert!(grid.resize(1200.0, 600.0, None));
    assert_eq!(grid.generation(), 1);
    match &grid.config().layout {
        Layout::GridWithAvoidance { rows, cols, .. } => {
            assert_eq!((*rows, *cols), (5, 10));
        }
        other => panic!("unexpected layout {other:?}"),
    }

    let mut scatter = GlowAnimation::new(Preset::Scatter.config());
    assert!(!scatter.resize(1200.0, 600.0, None));
    assert_eq!(scatter.generation(), 0);
}

#[test]
fn resize_with_unchanged_layout_keeps_running() {
    // no cell size: the grid does not depend on the viewport
    let mut grid = GlowAnimation::new(Preset::Grid.config());
    for _ in 0..10 {
        grid.tick(Duration::from_millis(16));
    }
    let phase = grid.scheduler().phase();
    assert!(!grid.resize(800.0, 600.0, None));
    assert!(!grid.resize(1920.0, 1080.0, Some(Vec::new())));
    assert_eq!(grid.generation(), 0);
    assert_eq!(grid.scheduler().phase(), phase);

    let mut framed = GlowAnimation::new(Preset::Framed.config());
    assert!(framed.resize(1200.0, 600.0, None));
    let avoid = framed.config().layout.avoid_rects().to_vec();
    assert!(!framed.resize(1200.0, 600.0, Some(avoid)));
    assert!(!framed.resize(1190.0, 590.0, None));
    assert_eq!(framed.generation(), 1);
}

#[test]
fn resize_replaces_avoid_rects_with_remeasured_ones() {
    let mut anim = GlowAnimation::new(Preset::Framed.config());
    let old = anim.config().layout.avoid_rects().to_vec();
    // the content column moved to the left half after reflow
    let moved = vec![AvoidRect::from_percent(0.0, 0.0, 50.0, 100.0)];
    assert!(anim.resize(1200.0, 600.0, Some(moved.clone())));
    assert_eq!(anim.config().layout.avoid_rects(), moved.as_slice());
    assert!(!anim.markers().is_empty());
    for m in anim.markers() {
        assert!(!moved[0].contains(m.position), "marker at {:?}", m.position);
    }
    // the stale rectangle no longer thins the grid
    assert!(anim
        .markers()
        .iter()
        .any(|m| old.iter().any(|r| r.contains(m.position))));
}

#[test]
fn resize_adds_avoidance_to_a_plain_grid() {
    let config = GlowConfig {
        cell_px: Some(100.0),
        ..Preset::Grid.config()
    };
    let mut anim = GlowAnimation::new(config);
    let rects = vec![AvoidRect::from_percent(25.0, 25.0, 75.0, 75.0)];
    assert!(anim.resize(1000.0, 800.0, Some(rects.clone())));
    assert_eq!(anim.config().layout.mode_name(), "grid-with-avoidance");
    assert!(anim.markers().iter().all(|m| !rects[0].contains(m.position)));
}

#[test]
fn never_started_loop_stops_without_touching_the_requester() {
    let mut fl = FrameLoop::new(FakeRequester::default());
    fl.stop();
    fl.stop();
    fl.schedule_next();
    assert!(fl.is_stopped());
    assert!(!fl.has_pending());
    assert!(fl.requester().requested.is_empty());
    assert!(fl.requester().cancelled.is_empty());
}

#[test]
fn same_seed_mounts_identically() {
    let a = GlowAnimation::new(Preset::Scatter.config());
    let b = GlowAnimation::new(Preset::Scatter.config());
    assert_eq!(a.markers(), b.markers());
    assert_eq!(a.scheduler().active_set(), b.scheduler().active_set());
}

#[test]
fn mount_sanitizes_configuration() {
    let config = GlowConfig {
        active_count: ActiveRange { min: 9, max: 2 },
        fade_boundary: 4.0,
        max_fps: 500.0,
        ..Preset::Grid.config()
    };
    let anim = GlowAnimation::new(config);
    assert_eq!(anim.config().active_count, ActiveRange::new(2, 9));
    assert_eq!(anim.config().fade_boundary, FADE_BOUNDARY);
    assert_eq!(anim.config().max_fps, MAX_FPS_LIMIT);
}
