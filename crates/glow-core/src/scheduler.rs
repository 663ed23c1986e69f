//! Cycle scheduler: decides which markers breathe, and when the next set
//! takes over.
//!
//! The scheduler is a two-state machine:
//!
//! - `Breathing`: the active set follows the brightness curve as `phase`
//!   advances. Once `phase` passes the near-end threshold the next set is
//!   picked and the scheduler moves to `HandingOff`.
//! - `HandingOff`: outgoing markers fade from the level they had when the
//!   handoff began, incoming markers ramp up to their cycle-start level, both
//!   driven by `transition_progress`. When progress reaches 1 the incoming
//!   set becomes active and `phase` restarts at 0, plus whatever part of
//!   the tick the handoff did not use.
//!
//! The only input is elapsed time, passed to [`CycleScheduler::tick`].

use crate::brightness::BrightnessCurve;
use crate::config::{ActiveRange, GlowConfig};
use crate::constants::MAX_PHASE;
use crate::marker::{Marker, MarkerId, MarkerState};
use fnv::FnvHashSet;
use rand::prelude::*;
use smallvec::SmallVec;
use std::time::Duration;

pub type MarkerSet = SmallVec<[MarkerId; 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleMode {
    Breathing,
    HandingOff,
}

pub struct CycleScheduler {
    markers: Vec<Marker>,
    curve: BrightnessCurve,
    band: ActiveRange,
    cycle_secs: f32,
    transition_secs: f32,
    near_end: f32,
    inactive_decay_per_sec: f32,
    rng: StdRng,

    mode: CycleMode,
    phase: f32,
    transition_progress: f32,
    active: MarkerSet,
    next: MarkerSet,
    // brightness of each outgoing marker when the handoff began
    handoff_levels: SmallVec<[(MarkerId, f32); 8]>,
    cycles_completed: u64,
}

impl CycleScheduler {
    /// Take ownership of a marker set and start breathing a first set
    /// immediately, at `phase = 0`.
    pub fn new(mut markers: Vec<Marker>, config: &GlowConfig, rng: StdRng) -> Self {
        for (i, m) in markers.iter_mut().enumerate() {
            m.id = i as MarkerId;
            m.state = MarkerState::Inactive;
            m.brightness = 0.0;
        }
        let pool = markers.len();
        if pool < config.active_count.min {
            log::warn!(
                "[glow] pool of {} markers is below the active minimum {}; clamping",
                pool,
                config.active_count.min
            );
        }
        let mut s = Self {
            markers,
            curve: BrightnessCurve::new(config.fade_boundary, config.fade_acceleration),
            band: config.active_count,
            cycle_secs: config.cycle_duration.as_secs_f32().max(f32::EPSILON),
            transition_secs: config.transition_duration.as_secs_f32(),
            near_end: config.near_end_threshold,
            inactive_decay_per_sec: config.inactive_decay_per_sec,
            rng,
            mode: CycleMode::Breathing,
            phase: 0.0,
            transition_progress: 0.0,
            active: MarkerSet::new(),
            next: MarkerSet::new(),
            handoff_levels: SmallVec::new(),
            cycles_completed: 0,
        };
        s.active = s.choose_set(&MarkerSet::new());
        for &id in &s.active {
            let m = &mut s.markers[id as usize];
            m.state = MarkerState::Active;
            m.brightness = s.curve.at(0.0, m.phase_offset);
        }
        s
    }

    /// Advance the animation by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        let dt_sec = dt.as_secs_f32();
        match self.mode {
            CycleMode::Breathing => {
                let phase = self.phase + dt_sec / self.cycle_secs;
                self.phase = phase.min(MAX_PHASE);
                self.update_breathing(dt_sec);
                if self.phase > self.near_end && self.next.is_empty() {
                    self.begin_handoff();
                }
            }
            CycleMode::HandingOff => {
                let (progress, overshoot_sec) = if self.transition_secs > 0.0 {
                    let raw = self.transition_progress + dt_sec / self.transition_secs;
                    (raw.min(1.0), ((raw - 1.0) * self.transition_secs).max(0.0))
                } else {
                    (1.0, 0.0)
                };
                self.transition_progress = progress;
                if progress >= 1.0 {
                    self.finish_handoff();
                    // time past the end of the handoff belongs to the new cycle
                    if overshoot_sec > 0.0 {
                        self.tick(Duration::from_secs_f32(overshoot_sec));
                    }
                } else {
                    self.update_handoff(dt_sec);
                }
            }
        }
    }

    fn update_breathing(&mut self, dt_sec: f32) {
        let phase = self.phase;
        let curve = self.curve;
        let decay = self.inactive_decay_per_sec * dt_sec;
        for m in &mut self.markers {
            match m.state {
                MarkerState::Active => m.brightness = curve.at(phase, m.phase_offset),
                MarkerState::Inactive | MarkerState::Transitioning => {
                    m.brightness = (m.brightness - decay).max(0.0)
                }
            }
        }
    }

    fn update_handoff(&mut self, dt_sec: f32) {
        let p = self.transition_progress;
        let curve = self.curve;
        let decay = self.inactive_decay_per_sec * dt_sec;
        for m in &mut self.markers {
            let from = self
                .handoff_levels
                .iter()
                .find(|(id, _)| *id == m.id)
                .map(|(_, level)| *level);
            m.brightness = match (m.state, from) {
                // outgoing
                (MarkerState::Transitioning, Some(level)) => level * (1.0 - p),
                // incoming, also breathed in the previous cycle
                (MarkerState::Active, Some(level)) => {
                    level + (curve.at(0.0, m.phase_offset) - level) * p
                }
                (MarkerState::Active, None) => p * curve.at(0.0, m.phase_offset),
                _ => (m.brightness - decay).max(0.0),
            }
            .clamp(0.0, 1.0);
        }
    }

    fn begin_handoff(&mut self) {
        let previous = self.active.clone();
        self.next = self.choose_set(&previous);
        self.handoff_levels = previous
            .iter()
            .map(|&id| (id, self.markers[id as usize].brightness))
            .collect();
        for &id in &previous {
            self.markers[id as usize].state = MarkerState::Transitioning;
        }
        for &id in &self.next {
            self.markers[id as usize].state = MarkerState::Active;
        }
        self.mode = CycleMode::HandingOff;
        self.transition_progress = 0.0;
        log::debug!(
            "[glow] handoff at phase {:.3}: {} outgoing -> {} incoming",
            self.phase,
            previous.len(),
            self.next.len()
        );
        if self.transition_secs <= 0.0 {
            self.finish_handoff();
        }
    }

    fn finish_handoff(&mut self) {
        let incoming = std::mem::take(&mut self.next);
        for &id in &self.active {
            if !incoming.contains(&id) {
                let m = &mut self.markers[id as usize];
                m.state = MarkerState::Inactive;
                m.brightness = 0.0;
            }
        }
        for &id in &incoming {
            let m = &mut self.markers[id as usize];
            m.state = MarkerState::Active;
            m.brightness = self.curve.at(0.0, m.phase_offset);
        }
        self.active = incoming;
        self.handoff_levels.clear();
        self.phase = 0.0;
        self.transition_progress = 0.0;
        self.mode = CycleMode::Breathing;
        self.cycles_completed += 1;
        log::debug!(
            "[glow] cycle {} breathing {} markers",
            self.cycles_completed,
            self.active.len()
        );
    }

    /// Pick a set size from the band and fill it with markers outside
    /// `exclude`, reusing excluded markers only when the pool runs short.
    fn choose_set(&mut self, exclude: &MarkerSet) -> MarkerSet {
        let pool = self.markers.len();
        let k = self.band.pick(pool, &mut self.rng);
        let excluded: FnvHashSet<MarkerId> = exclude.iter().copied().collect();
        let fresh: Vec<MarkerId> = self
            .markers
            .iter()
            .map(|m| m.id)
            .filter(|id| !excluded.contains(id))
            .collect();
        let mut chosen: MarkerSet = fresh
            .choose_multiple(&mut self.rng, k.min(fresh.len()))
            .copied()
            .collect();
        if chosen.len() < k {
            let mut reuse: Vec<MarkerId> = exclude.to_vec();
            reuse.shuffle(&mut self.rng);
            let missing = k - chosen.len();
            log::debug!(
                "[glow] only {} fresh markers for a set of {}; reusing {}",
                fresh.len(),
                k,
                missing
            );
            chosen.extend(reuse.into_iter().take(missing));
        }
        chosen
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Owned copy of the marker list.
    pub fn snapshot(&self) -> Vec<Marker> {
        self.markers.clone()
    }

    pub fn mode(&self) -> CycleMode {
        self.mode
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn transition_progress(&self) -> f32 {
        self.transition_progress
    }

    pub fn active_set(&self) -> &[MarkerId] {
        &self.active
    }

    /// Replacement set; empty outside a handoff.
    pub fn next_set(&self) -> &[MarkerId] {
        &self.next
    }

    /// Active band after clamping to the pool size.
    pub fn effective_band(&self) -> ActiveRange {
        self.band.clamp_to_pool(self.markers.len())
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn count_in(&self, state: MarkerState) -> usize {
        self.markers.iter().filter(|m| m.state == state).count()
    }
}
