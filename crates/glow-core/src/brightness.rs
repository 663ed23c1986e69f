//! Breathing brightness curve.
//!
//! A marker's brightness over one cycle rises linearly up to the fade
//! boundary and then falls off faster than linear. The asymmetry is part of
//! the look: a symmetric sine reads as sluggish next to it.

use crate::constants::{FADE_ACCELERATION, FADE_BOUNDARY, MAX_PHASE};

/// Asymmetric fade-in / accelerated fade-out curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrightnessCurve {
    pub fade_boundary: f32,
    pub fade_acceleration: f32,
}

impl Default for BrightnessCurve {
    fn default() -> Self {
        Self {
            fade_boundary: FADE_BOUNDARY,
            fade_acceleration: FADE_ACCELERATION,
        }
    }
}

impl BrightnessCurve {
    /// Build a curve, clamping the boundary into (0, 1) and the
    /// acceleration to a positive value.
    pub fn new(fade_boundary: f32, fade_acceleration: f32) -> Self {
        let fade_boundary = if fade_boundary.is_finite() {
            fade_boundary.clamp(0.01, 0.99)
        } else {
            FADE_BOUNDARY
        };
        let fade_acceleration = if fade_acceleration.is_finite() && fade_acceleration > 0.0 {
            fade_acceleration
        } else {
            FADE_ACCELERATION
        };
        Self {
            fade_boundary,
            fade_acceleration,
        }
    }

    /// Brightness in \[0, 1\] for a cycle phase and a per-marker offset.
    pub fn at(&self, phase: f32, phase_offset: f32) -> f32 {
        let p = wrap_unit(wrap_unit(phase) + wrap_unit(phase_offset));
        let b = self.fade_boundary;
        let v = if p < b {
            p / b
        } else {
            let t = (p - b) / (1.0 - b);
            1.0 - (t * self.fade_acceleration).min(1.0)
        };
        v.clamp(0.0, 1.0)
    }
}

/// Brightness on the default curve (boundary 0.6, acceleration 1.4).
#[inline]
pub fn brightness_at(phase: f32, phase_offset: f32) -> f32 {
    BrightnessCurve::default().at(phase, phase_offset)
}

/// Map any value into \[0, 1). Non-finite input maps to 0.
#[inline]
pub fn wrap_unit(x: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    let w = x.rem_euclid(1.0);
    // rem_euclid rounds tiny negatives up to exactly 1.0
    if w >= 1.0 {
        0.0
    } else {
        w.min(MAX_PHASE)
    }
}
