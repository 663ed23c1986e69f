use glam::Vec2;

/// Stable marker identity. Equal to the marker's index in the scheduler's
/// marker list for the lifetime of one mount.
pub type MarkerId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MarkerState {
    #[default]
    Inactive,
    Active,
    /// Fading out while its replacement fades in.
    Transitioning,
}

/// One decorative glow point.
///
/// Position, size and phase offset are fixed at creation. Only `state` and
/// `brightness` change, and only the cycle scheduler changes them.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    /// Normalized position in the unit square (0,0 is top-left).
    pub position: Vec2,
    /// Rendering size in CSS pixels.
    pub size: f32,
    /// Constant in \[0, 1) added to the cycle phase.
    pub phase_offset: f32,
    pub(crate) state: MarkerState,
    pub(crate) brightness: f32,
}

impl Marker {
    pub fn new(id: MarkerId, position: Vec2, size: f32, phase_offset: f32) -> Self {
        Self {
            id,
            position,
            size,
            phase_offset: crate::brightness::wrap_unit(phase_offset),
            state: MarkerState::Inactive,
            brightness: 0.0,
        }
    }

    #[inline]
    pub fn state(&self) -> MarkerState {
        self.state
    }

    #[inline]
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Whether the marker needs drawing this frame.
    #[inline]
    pub fn is_lit(&self) -> bool {
        self.brightness > 0.0
    }
}
