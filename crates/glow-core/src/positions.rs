//! Marker layout: grid, scatter and grid-with-avoidance.
//!
//! All positions are normalized to the unit square. Randomness comes only
//! from the generator passed in, so a seeded RNG gives a repeatable layout.

use crate::config::{AvoidRect, GlowConfig, Layout};
use crate::constants::SCATTER_MARGIN;
use crate::marker::{Marker, MarkerId};
use glam::Vec2;
use rand::Rng;

/// Evenly spaced cell centers, each perturbed by up to `jitter_percent`
/// percent of the viewport on both axes.
pub fn grid_positions<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    jitter_percent: f32,
    rng: &mut R,
) -> Vec<Vec2> {
    let jitter = (jitter_percent / 100.0).max(0.0);
    let mut out = Vec::with_capacity(rows.saturating_mul(cols));
    for r in 0..rows {
        for c in 0..cols {
            let base = Vec2::new(
                (c as f32 + 0.5) / cols as f32,
                (r as f32 + 0.5) / rows as f32,
            );
            let offset = if jitter > 0.0 {
                Vec2::new(
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                )
            } else {
                Vec2::ZERO
            };
            out.push((base + offset).clamp(Vec2::ZERO, Vec2::ONE));
        }
    }
    out
}

/// `count` uniform positions inside the unit square inset by the scatter
/// margin, so nothing clips the viewport edge.
pub fn scatter_positions<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Vec2> {
    let lo = SCATTER_MARGIN;
    let hi = 1.0 - SCATTER_MARGIN;
    (0..count)
        .map(|_| Vec2::new(rng.gen_range(lo..hi), rng.gen_range(lo..hi)))
        .collect()
}

/// Grid positions with everything inside any avoid rectangle dropped.
/// Jitter is applied before the test, so no returned point lies inside.
pub fn grid_with_avoidance<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    jitter_percent: f32,
    avoid: &[AvoidRect],
    rng: &mut R,
) -> Vec<Vec2> {
    let mut positions = grid_positions(rows, cols, jitter_percent, rng);
    positions.retain(|p| !avoid.iter().any(|rect| rect.contains(*p)));
    positions
}

/// Positions for a layout.
pub fn layout_positions<R: Rng + ?Sized>(layout: &Layout, rng: &mut R) -> Vec<Vec2> {
    match layout {
        Layout::Grid { rows, cols, jitter } => grid_positions(*rows, *cols, *jitter, rng),
        Layout::Scatter { count } => scatter_positions(*count, rng),
        Layout::GridWithAvoidance {
            rows,
            cols,
            jitter,
            avoid,
        } => grid_with_avoidance(*rows, *cols, *jitter, avoid, rng),
    }
}

/// Build the full marker set for a configuration. Ids are assigned
/// sequentially from 0.
pub fn generate<R: Rng + ?Sized>(config: &GlowConfig, rng: &mut R) -> Vec<Marker> {
    let (size_lo, size_hi) = config.size_range;
    layout_positions(&config.layout, rng)
        .into_iter()
        .enumerate()
        .map(|(i, position)| {
            let size = if size_hi > size_lo {
                rng.gen_range(size_lo..size_hi)
            } else {
                size_lo
            };
            let phase_offset = if config.max_phase_offset > 0.0 {
                rng.gen_range(0.0..config.max_phase_offset)
            } else {
                0.0
            };
            Marker::new(i as MarkerId, position, size, phase_offset)
        })
        .collect()
}
